fn main() {
    // ESP-IDF build-environment propagation is only wanted when the
    // espidf feature is on; host-target test builds skip it.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
