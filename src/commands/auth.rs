use std::sync::Arc;

use crate::api::vaultpay::RegistrationRequest;
use crate::app::App;
use crate::session::{Navigator, Route};

pub async fn login(app: &Arc<App>, args: &[&str]) -> Result<(), String> {
    let [email, password] = args else {
        return Err("Usage: `login <email> <password>`".to_string());
    };

    if app.router.current() == Route::Dashboard {
        return Err("Already logged in. Use `logout` first.".to_string());
    }

    app.auth.login(email, password).await?;
    println!("✅ Welcome back, {}!", email);
    Ok(())
}

pub async fn register(app: &Arc<App>, args: &[&str]) -> Result<(), String> {
    if args.len() < 5 || args.len() > 6 {
        return Err(
            "Usage: `register <first> <last> <email> <aadhaar> <password> [phone]`".to_string(),
        );
    }

    if app.router.current() == Route::Dashboard {
        return Err("Already logged in. Use `logout` first.".to_string());
    }
    app.router.navigate(Route::Register);

    let request = RegistrationRequest {
        first_name: args[0].to_string(),
        last_name: args[1].to_string(),
        email: args[2].to_string(),
        aadhaar_number: args[3].to_string(),
        password: args[4].to_string(),
        phone_number: args.get(5).map(|p| p.to_string()).unwrap_or_default(),
    };

    app.auth.register(&request).await?;
    println!("✅ Account created for {}. You can now `login`.", request.email);
    Ok(())
}

pub fn logout(app: &Arc<App>) -> Result<(), String> {
    if !app.auth.is_authenticated() {
        return Err("You are not logged in.".to_string());
    }
    app.auth.logout()
}
