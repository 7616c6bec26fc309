#![windows_subsystem = "windows"]

#[tokio::main]
async fn main() {
    slidecast::desktop_main().await;
}
