/// Route the crate's `log` output through the test harness; `RUST_LOG=debug`
/// shows cache builds and cascade steps.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
