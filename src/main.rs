use std::io::Read;
use std::process::ExitCode;

use radpilot_lib::config::{self, GatewayConfig};
use radpilot_lib::pipeline::synthesis::{OpenAiGateway, ReportSynthesizer};

fn main() -> ExitCode {
    radpilot_lib::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("Failed to read request from stdin: {e}");
        return ExitCode::from(1);
    }

    let gateway = match OpenAiGateway::new(&GatewayConfig::from_env()) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let synthesizer = ReportSynthesizer::new(Box::new(gateway));

    match radpilot_lib::draft_from_json(&synthesizer, &input) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to encode draft: {e}");
                ExitCode::from(1)
            }
        },
        Err(e) => {
            tracing::warn!(exit_code = e.exit_code(), "Drafting failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
