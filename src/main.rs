#[tokio::main]
async fn main() {
    user_admin::run().await;
}
