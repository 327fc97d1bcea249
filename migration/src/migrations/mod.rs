pub mod m202606010001_create_users;
pub mod m202606010002_create_subjects;
pub mod m202606010003_create_batches;
pub mod m202606010004_create_class_configs;
pub mod m202606150001_create_attendance;
