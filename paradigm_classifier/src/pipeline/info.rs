use crate::config::compile_time::{batch_processing, file_processing};
use crate::file_processor::KNOWN_EXTENSIONS;

/// Static description of the pipeline, shown by `--version`
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub max_file_size: u64,
    pub max_worker_threads: usize,
    pub supported_extensions: Vec<&'static str>,
    pub build_profile: &'static str,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "Classification pipeline:\n\
             - Stages: {}\n\
             - Max File Size: {} KB\n\
             - Max Worker Threads: {}\n\
             - Known Extensions: {}\n\
             - Build Profile: {}",
            self.stages.join(" -> "),
            self.max_file_size / 1024,
            self.max_worker_threads,
            self.supported_extensions.join(", "),
            self.build_profile
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: vec!["file", "scan", "token stream", "syntax", "scoring"],
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_worker_threads: batch_processing::MAX_WORKER_THREADS,
        supported_extensions: KNOWN_EXTENSIONS.to_vec(),
        build_profile: crate::config::build_info::profile(),
    }
}
