#[tokio::main]
async fn main() -> anyhow::Result<()> {
    popsicle_factory::app::run().await
}
