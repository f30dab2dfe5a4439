pub mod job;
pub mod job_counts;
pub mod job_output;
pub mod job_record;
