//! Template command implementation.
//!
//! Prints a sample configuration that `--config` accepts.

use anyhow::Result;
use clap::{Args, ValueEnum};

use lattice_config::{ConfigFormat, PricingConfig};

/// Arguments for the template command.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// File format of the template
    #[arg(long = "as", value_enum, default_value = "toml")]
    pub syntax: TemplateSyntax,
}

/// Template file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateSyntax {
    /// TOML document
    Toml,
    /// JSON document
    Json,
}

impl From<TemplateSyntax> for ConfigFormat {
    fn from(syntax: TemplateSyntax) -> Self {
        match syntax {
            TemplateSyntax::Toml => ConfigFormat::Toml,
            TemplateSyntax::Json => ConfigFormat::Json,
        }
    }
}

/// Execute the template command.
pub fn execute(args: &TemplateArgs) -> Result<()> {
    let text = PricingConfig::template().render(args.syntax.into())?;
    println!("{text}");
    Ok(())
}
