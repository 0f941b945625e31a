// ABOUTME: Configuration names shared across Intake packages
// ABOUTME: Environment variable constants only; parsing lives with each consumer

pub mod constants;
