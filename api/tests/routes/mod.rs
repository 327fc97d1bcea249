mod batches_test;
mod class_configs_test;
mod health_test;
mod sessions;
mod subjects_test;
