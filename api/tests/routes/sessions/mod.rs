mod delete_test;
mod put_test;
