pub mod crush_spec_factory;
pub mod job_config_factory;
pub mod manifest_factory;
pub mod source_file_factory;

pub use crush_spec_factory::CrushSpecFactory;
pub use job_config_factory::JobConfigFactory;
pub use manifest_factory::ManifestFactory;
pub use source_file_factory::SourceFileFactory;

#[cfg(test)]
mod crush_spec_factory_test;
#[cfg(test)]
mod job_config_factory_test;
#[cfg(test)]
mod manifest_factory_test;
#[cfg(test)]
mod source_file_factory_test;
