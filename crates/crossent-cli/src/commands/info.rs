//! Info command: print the contents of a checkpoint file.

use std::path::Path;

use crossent::Checkpoint;

use crate::error::{CliError, Result};

pub(crate) fn run(path: &Path, json: bool) -> Result<()> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let checkpoint = Checkpoint::load(path)?;

    if json {
        println!("{}", checkpoint.to_json()?);
        return Ok(());
    }

    println!("Checkpoint: {}", path.display());
    println!("====================");
    println!("Version:        {}", checkpoint.version);
    println!("Dimension:      {}", checkpoint.mean.len());
    println!("Generation:     {}", checkpoint.generation);
    println!("Evaluations:    {}", checkpoint.evaluations);
    println!("Population:     {}", checkpoint.population_size);
    println!("Selection:      {}", checkpoint.selection_size);
    println!("Recombination:  {}", checkpoint.recombination.as_str());
    println!("Noise:          {}", checkpoint.noise.description());
    println!();
    println!("Mean:           {}", format_vector(&checkpoint.mean));
    println!("Variance:       {}", format_vector(&checkpoint.variance));
    match &checkpoint.best {
        Some(best) => {
            println!("Best fitness:   {:.6e}", best.fitness);
            println!("Best point:     {}", format_vector(&best.point));
        }
        None => println!("Best fitness:   (none)"),
    }
    Ok(())
}

/// `[a, b, c]` with six decimals per component.
pub(crate) fn format_vector(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
