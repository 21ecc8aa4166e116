//! One loader per artifact format.

pub mod approved;
pub mod data_dictionary;
pub mod diagrams;
pub mod epics;
pub mod generic;
pub mod requirements;
pub mod tasks;
pub mod tech_stack;
pub mod ux;
pub mod work_breakdown;

pub use approved::{ApprovedLink, ApprovedLinkLog, ApprovedLinksLoader};
pub use data_dictionary::DataDictionaryLoader;
pub use diagrams::DiagramsLoader;
pub use epics::EpicsLoader;
pub use generic::GenericArrayLoader;
pub use requirements::RequirementsLoader;
pub use tasks::TasksLoader;
pub use tech_stack::{TechStackLoader, TECH_STACK_ID};
pub use ux::UxSpecLoader;
pub use work_breakdown::WorkBreakdownLoader;
