mod cli;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("jsonxsd: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let text = std::fs::read_to_string(&cli.input).map_err(|e| format!("reading '{}': {e}", cli.input))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("parsing '{}' as JSON: {e}", cli.input))?;

    let xsd_file_name = format!("{}.xsd", cli.output);
    let xml_file_name = format!("{}.xml", cli.output);

    log::info!("inferring type graph rooted at '{}' from '{}'", cli.root_name, cli.input);
    let rendered = jsonxsd::generate(&cli.root_name, &[value.clone()], &value, &xsd_file_name, cli.locale.into())
        .map_err(|e| e.to_string())?;

    std::fs::write(&xsd_file_name, &rendered.xsd).map_err(|e| format!("writing '{xsd_file_name}': {e}"))?;
    std::fs::write(&xml_file_name, &rendered.xml).map_err(|e| format!("writing '{xml_file_name}': {e}"))?;
    log::info!("wrote '{xsd_file_name}' and '{xml_file_name}'");
    Ok(())
}
