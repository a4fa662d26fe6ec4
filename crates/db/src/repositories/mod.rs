pub mod account_repo;
pub mod assignment_repo;
pub mod attachment_repo;
pub mod department_repo;
pub mod evaluation_repo;
pub mod lecturer_repo;
pub mod logbook_repo;
pub mod placement_repo;
pub mod report_repo;
pub mod session_repo;

pub use account_repo::AccountRepo;
pub use assignment_repo::AssignmentRepo;
pub use attachment_repo::AttachmentRepo;
pub use department_repo::DepartmentRepo;
pub use evaluation_repo::EvaluationRepo;
pub use lecturer_repo::LecturerRepo;
pub use logbook_repo::LogbookRepo;
pub use placement_repo::PlacementRepo;
pub use report_repo::ReportRepo;
pub use session_repo::SessionRepo;
