pub mod config;
pub mod enroll;
pub mod identify;
pub mod list;
pub mod status;
pub mod vector_file;

pub use enroll::run_enroll;
pub use identify::run_identify;
pub use list::list_speakers;
pub use status::show_status;
