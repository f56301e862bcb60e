fn main() {
    let mut validate_only = false;
    let mut show_density = false;
    let mut path: Option<String> = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--test" | "--validate" => {
                validate_only = true;
                i += 1;
            }
            "--density" => {
                show_density = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            arg if arg.starts_with('-') => usage_and_exit(2),
            arg => {
                if path.is_some() {
                    usage_and_exit(2);
                }
                path = Some(arg.to_string());
                i += 1;
            }
        }
    }

    if validate_only {
        match dsd::validate::validate_reference_scenario() {
            Ok(()) => {
                println!("Validation OK: bundled reference scenario is correct.");
                return;
            }
            Err(e) => {
                eprintln!("Validation FAILED: {e}");
                std::process::exit(1);
            }
        }
    }

    let Some(path) = path else { usage_and_exit(2) };
    let matrix = match dsd::affinity::AffinityMatrix::load_from_file(&path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    };

    let consensus = dsd::solve::solve(&matrix);
    let rendered: Vec<String> = consensus.iter().map(ToString::to_string).collect();
    println!("{}", rendered.join(" "));
    if show_density {
        println!("density: {:.6}", dsd::solve::density_of(&matrix, &consensus));
    }
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  dsd [--density] <matrix-file>\n  dsd --validate\n\nOptions:\n  <matrix-file>      Square whitespace-separated affinity matrix, one row per line\n  --density          Also print the density of the returned consensus set\n  --test/--validate  Validate the bundled reference scenario (fast, deterministic)\n"
    );
    std::process::exit(code)
}
