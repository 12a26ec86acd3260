fn main() {
    if let Err(err) = rex::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
