pub mod attendance_record;
pub mod attendance_session;
pub mod batch;
pub mod batch_student;
pub mod class_config;
pub mod subject;
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use attendance_session::Entity as AttendanceSession;
pub use batch::Entity as Batch;
pub use batch_student::Entity as BatchStudent;
pub use class_config::Entity as ClassConfig;
pub use subject::Entity as Subject;
pub use user::Entity as User;
