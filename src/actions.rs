use crate::{
    fs::{open_collection, save_collection},
    scaffold::Scaffold,
    types::node_name,
    walker::{scaffold_collection, Summary},
};
use anyhow::{bail, Context, Result};
use log::info;
use std::{
    path::{Path, PathBuf},
    process,
};

pub const DEFAULT_COLLECTION: &str = "postman/colkection/Products.postman_collection.json";

pub fn action_scaffold(c: &seahorse::Context) {
    let output = c.string_flag("output").ok().map(PathBuf::from);
    run(&c.args, output.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    })
}

fn run(args: &[String], output: Option<&Path>) -> Result<()> {
    let inputs: Vec<PathBuf> = if args.is_empty() {
        vec![PathBuf::from(DEFAULT_COLLECTION)]
    } else {
        args.iter().map(PathBuf::from).collect()
    };
    if output.is_some() && inputs.len() > 1 {
        bail!("--output can only be used with a single collection file")
    }
    let scaffold = Scaffold::new().with_context(|| "Failed to build scaffold.")?;
    for input in &inputs {
        process(input, output.unwrap_or(input.as_path()), &scaffold)?;
    }
    Ok(())
}

/// Loads `input`, scaffolds every request and writes the result to
/// `output`. Nothing is written unless the whole collection was walked.
pub fn process(input: &Path, output: &Path, scaffold: &Scaffold) -> Result<Summary> {
    let mut collection = open_collection(input)?;
    let summary = scaffold_collection(&mut collection, scaffold)
        .with_context(|| format!("Failed to scaffold collection: {:?}", input))?;
    save_collection(output, &collection)?;
    let name = collection
        .fields()
        .get("info")
        .and_then(|i| i.as_object())
        .and_then(node_name)
        .unwrap_or("<unnamed>");
    info!(
        "{:?} ({}): {} requests in {} folders written to {:?}",
        input, name, summary.requests, summary.folders, output
    );
    Ok(summary)
}
