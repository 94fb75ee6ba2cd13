use crate::engine::genome::Chromosome;
use crate::engine::runner::{GenerationObserver, GenerationReport};
use crate::error::{GaError, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Prints one line per generation: the feature segment with 0s in cyan and
/// 1s in blue, the parameter segment likewise, then the selection ratio and
/// the composite fitness percentage.
pub struct ConsoleObserver;

fn colorize_bits(bits: &[u8]) -> String {
    bits.iter()
        .map(|&b| {
            if b == 0 {
                "0".cyan().to_string()
            } else {
                "1".blue().to_string()
            }
        })
        .collect()
}

impl GenerationObserver for ConsoleObserver {
    fn on_generation(&mut self, report: &GenerationReport) {
        println!(
            "{} {} {} {} {}",
            "Solution:".red(),
            colorize_bits(report.chromosome.feature_mask()),
            colorize_bits(report.chromosome.param_segment()),
            format!("({}/{})", report.selected, report.total_features).red(),
            format!("{:.4}%", report.fitness).red()
        );
    }
}

/// Write the winning chromosome's bit string as a single line of text.
pub fn write_solution<P: AsRef<Path>>(path: P, chromosome: &Chromosome) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", chromosome)?;
    Ok(())
}

/// 1-based indices of kept and dropped features, in mask order.
pub fn split_indices(mask: &[u8]) -> (Vec<usize>, Vec<usize>) {
    let mut selected = Vec::new();
    let mut removed = Vec::new();
    for (i, &bit) in mask.iter().enumerate() {
        if bit == 1 {
            selected.push(i + 1);
        } else {
            removed.push(i + 1);
        }
    }
    (selected, removed)
}

pub fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered feature names: one feature per non-blank line, name in the first
/// comma-separated field.
pub fn load_feature_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path.as_ref()).map_err(|e| {
        GaError::Report(format!(
            "Cannot read feature name list {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        names.push(line.split(',').next().unwrap_or("").to_string());
    }
    Ok(names)
}

/// Names of the features the winning mask keeps, in list order.
pub fn selected_feature_names(mask: &[u8], names: &[String]) -> Result<Vec<String>> {
    if names.len() < mask.len() {
        return Err(GaError::Report(format!(
            "Feature name list has {} entries, mask needs {}",
            names.len(),
            mask.len()
        )));
    }
    Ok(mask
        .iter()
        .zip(names)
        .filter(|(&bit, _)| bit == 1)
        .map(|(_, name)| name.clone())
        .collect())
}

/// Final console report: model path, selected feature names, kept and dropped
/// index lists.
pub fn print_final_report<P: AsRef<Path>>(
    chromosome: &Chromosome,
    names_path: P,
    output_path: &Path,
) -> Result<()> {
    let names = load_feature_names(names_path)?;
    let mask = chromosome.feature_mask();
    let (selected, removed) = split_indices(mask);

    println!();
    println!(
        "{} {}",
        "Model path:".red(),
        output_path.display().to_string().blue()
    );

    println!();
    println!("{}", "Names of the selected features by GA:".red());
    for name in selected_feature_names(mask, &names)? {
        println!("{}", name.blue());
    }

    println!();
    println!(
        "{} {}",
        "Indices of selected features by GA:".red(),
        format_indices(&selected).blue()
    );
    println!(
        "{} {}",
        "Indices of removed features by GA:".red(),
        format_indices(&removed).blue()
    );
    println!();

    Ok(())
}
