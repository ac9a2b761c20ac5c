fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = meshbin::app::run_from_env() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
