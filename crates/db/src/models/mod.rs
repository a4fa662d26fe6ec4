pub mod account;
pub mod assignment;
pub mod attachment;
pub mod department;
pub mod evaluation;
pub mod lecturer;
pub mod logbook_entry;
pub mod placement_form;
pub mod report;
pub mod session;
