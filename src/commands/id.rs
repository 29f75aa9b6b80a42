use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::{IdAction, OutputFormat};
use crate::ident::CompositeId;

pub fn run(action: IdAction) -> Result<()> {
    match action {
        IdAction::Encode {
            organization,
            provider_key,
            internal_id,
        } => {
            let id = CompositeId::encode(&organization, &provider_key, &internal_id)?;
            println!("{}", id);
            Ok(())
        }
        IdAction::Decode { id, format } => decode(&id, OutputFormat::resolve(format)),
    }
}

#[derive(Serialize)]
struct Parts<'a> {
    organization: &'a str,
    provider_key: &'a str,
    internal_id: &'a str,
}

fn decode(raw: &str, format: OutputFormat) -> Result<()> {
    let id: CompositeId = raw.parse()?;
    let (organization, provider_key, internal_id) = id.decode();
    let parts = Parts {
        organization,
        provider_key,
        internal_id,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parts)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&parts)?),
        OutputFormat::Text => {
            println!("  {}: {}", "organization".cyan(), parts.organization);
            println!("  {}: {}", "provider_key".cyan(), parts.provider_key);
            println!("  {}: {}", "internal_id".cyan(), parts.internal_id);
        }
    }

    Ok(())
}
