use std::io;

use sms24x::{AuthContext, Sms24xClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = std::env::var("SMS24X_USERNAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS24X_USERNAME environment variable is required",
        )
    })?;
    let password = std::env::var("SMS24X_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS24X_PASSWORD environment variable is required",
        )
    })?;
    let phone = std::env::var("SMS24X_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS24X_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("SMS24X_MESSAGE")
        .unwrap_or_else(|_| "Hello from the sms24x demo.".to_owned());

    let auth = AuthContext::new(username, password)?;
    let client = Sms24xClient::new(Some(auth));

    let id = client.send_text(&message, phone, None).await?;
    println!("message id: {id}");

    Ok(())
}
