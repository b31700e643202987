// Main entry point that forwards to the edgewave-app library
fn main() {
    // Exit non-zero when the app reports an error
    std::process::exit(match edgewave_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    });
}
