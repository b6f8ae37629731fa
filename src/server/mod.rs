pub mod router;

pub use router::{CrmState, crm_router};
