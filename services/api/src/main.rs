use money_pilot_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("money-pilot error: {err}");
        std::process::exit(1);
    }
}
