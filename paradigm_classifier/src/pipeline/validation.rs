/// Validate every stage's codes and limits before any input is processed
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_logging()?;
    crate::tokens::init_token_format_logging()?;
    crate::syntax::init_syntax_logging()?;
    crate::scoring::init_scoring_logging()?;
    crate::batch::init_batch_logging()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 6
    );

    Ok(())
}
