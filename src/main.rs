fn main() {
    if let Err(err) = sheet_compare::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
