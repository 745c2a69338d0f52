mod app;

use std::process::ExitCode;
use app::app::App;

fn main() -> ExitCode {
    match App::new().run() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(code) => ExitCode::from(code as u8),
    }
}
