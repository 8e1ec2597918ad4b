fn main() {
    if let Err(err) = sm_batch::run() {
        eprintln!("sm-batch failed: {err}");
        std::process::exit(1);
    }
}
