pub mod delete_dataset;
pub mod make_token;
pub mod set_upload_status;
