pub mod job_input_dto;
pub mod run_job_dto;
