//! Roster inspection command implementation.

use super::output::{format_text, JsonNetSummary, JsonRosterSummary};
use super::{CliError, OutputFormat};
use neurovolve::persistence::{decode, read_roster};
use neurovolve::{MutationConfig, PopulationConfig};
use std::path::Path;

/// Execute the inspect command.
///
/// # Errors
///
/// Returns an error if the roster cannot be read, its shape is unknown, or
/// it fails validation.
pub(crate) fn execute(
    roster: &Path,
    net: Option<usize>,
    inputs: Option<usize>,
    outputs: Option<usize>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let file = read_roster(roster)?;

    let recorded = file.shape();
    let (Some(inputs), Some(outputs)) = (
        inputs.or(recorded.map(|(i, _)| i)),
        outputs.or(recorded.map(|(_, o)| o)),
    ) else {
        return Err(CliError::new(format!(
            "{} does not record its shape; pass --inputs and --outputs",
            roster.display()
        )));
    };

    let config = PopulationConfig {
        size: file.nets.len(),
        inputs,
        outputs,
        mutation: MutationConfig::default(),
    };
    let population = decode(&file, config)?;

    let selected: Vec<usize> = match net {
        Some(index) if index < population.len() => vec![index],
        Some(index) => {
            return Err(CliError::new(format!(
                "net {index} does not exist (roster holds {})",
                population.len()
            )));
        }
        None => (0..population.len()).collect(),
    };

    let summary = JsonRosterSummary {
        generation: population.generation(),
        nets: selected
            .into_iter()
            .map(|index| JsonNetSummary {
                index,
                summary: population.brains()[index].summary(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Text => print!("{}", format_text(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
