mod contact_repo;
mod dashboard_repo;
mod document_repo;
mod invoice_repo;
mod phase_repo;
mod profile_repo;
mod project_repo;
mod task_repo;
mod todo_repo;

pub use contact_repo::ContactRepo;
pub use dashboard_repo::DashboardRepo;
pub use document_repo::DocumentRepo;
pub use invoice_repo::InvoiceRepo;
pub use phase_repo::PhaseRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use todo_repo::TodoRepo;
