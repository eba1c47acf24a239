#[tokio::main]
async fn main() {
  if let Err(e) = workout_coach::run().await {
    eprintln!("workout-coach failed: {}", e);
    std::process::exit(1);
  }
}
