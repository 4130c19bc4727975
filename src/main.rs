// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(
    all(feature = "gui", not(debug_assertions)),
    windows_subsystem = "windows"
)]

#[cfg(feature = "gui")]
fn main() {
    webrtc_demo_lib::run()
}

#[cfg(not(feature = "gui"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    headless::run().await
}

/// Terminal stand-in for the button:
/// `webrtc-demo [--presses <n>] [--linger <secs>] [--loopback] [--config <json>]`
#[cfg(not(feature = "gui"))]
mod headless {
    use std::time::Duration;
    use tokio::sync::watch;
    use webrtc_demo_lib::{SessionConfig, Shell};

    struct Options {
        presses: usize,
        linger: Duration,
        loopback: bool,
        config: Option<SessionConfig>,
    }

    fn parse_args(args: &[String]) -> Result<Options, Box<dyn std::error::Error>> {
        let mut options = Options {
            presses: 1,
            linger: Duration::from_secs(5),
            loopback: false,
            config: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--presses" => {
                    i += 1;
                    options.presses = args.get(i).ok_or("--presses needs a value")?.parse()?;
                }
                "--linger" => {
                    i += 1;
                    let secs: u64 = args.get(i).ok_or("--linger needs a value")?.parse()?;
                    options.linger = Duration::from_secs(secs);
                }
                "--loopback" => options.loopback = true,
                "--config" => {
                    i += 1;
                    let json = args.get(i).ok_or("--config needs a JSON value")?;
                    options.config = Some(serde_json::from_str(json)?);
                }
                other => return Err(format!("unknown argument: {other}").into()),
            }
            i += 1;
        }
        Ok(options)
    }

    /// Prints lines appended after `printed`.
    fn print_new(rx: &mut watch::Receiver<Vec<String>>, printed: &mut usize) {
        let lines = rx.borrow_and_update();
        for line in lines.iter().skip(*printed) {
            println!("{line}");
        }
        *printed = lines.len();
    }

    pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args: Vec<String> = std::env::args().collect();
        let options = match parse_args(&args) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("{e}");
                eprintln!(
                    "Usage: webrtc-demo [--presses <n>] [--linger <secs>] [--loopback] [--config <json>]"
                );
                std::process::exit(2);
            }
        };

        let mut config = options.config.unwrap_or_default();
        if options.loopback {
            config.factory.include_loopback_candidate = true;
        }
        config.validate()?;

        let mut shell = Shell::new(config);
        let mut rx = shell.log().subscribe();
        let mut printed = 0;
        print_new(&mut rx, &mut printed);

        for _ in 0..options.presses {
            shell.press().await?;
            print_new(&mut rx, &mut printed);

            let deadline = tokio::time::sleep(options.linger);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        print_new(&mut rx, &mut printed);
                    }
                }
            }
        }

        shell.shutdown().await?;
        print_new(&mut rx, &mut printed);
        Ok(())
    }
}
