//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! dokan auth login -e sara@example.ir -p '...'
//! dokan auth register --first-name Sara --last-name Ahmadi -e sara@example.ir \
//!     --phone 09121234567 -p '...' --confirm-password '...'
//! dokan auth whoami
//! dokan auth update --phone 09351234567 --city Tehran
//! dokan auth logout
//! ```
//!
//! Passwords can also be supplied through `DOKAN_PASSWORD`.

use clap::Subcommand;
use dokan_core::Email;
use dokan_storefront::models::{Address, RegisterRequest, User, UserUpdate};
use secrecy::SecretString;

use crate::app::App;
use crate::error::CliError;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: Email,

        #[arg(short, long, env = "DOKAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: Email,

        #[arg(long)]
        phone: String,

        #[arg(short, long, env = "DOKAN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Must match the password
        #[arg(long)]
        confirm_password: String,
    },
    /// End the session on this machine
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change profile fields locally; omitted fields are kept
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<Email>,

        #[arg(long)]
        phone: Option<String>,

        /// Replaces the whole address together with the other address flags
        #[arg(long)]
        street: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        province: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },
}

pub async fn run(app: &App, command: AuthCommand) -> Result<(), CliError> {
    match command {
        AuthCommand::Login { email, password } => {
            let user = app
                .auth
                .login(email.as_str(), SecretString::from(password))
                .await?;
            println!("خوش آمدید {}", user.full_name());
        }
        AuthCommand::Register {
            first_name,
            last_name,
            email,
            phone,
            password,
            confirm_password,
        } => {
            check_password_confirmation(&password, &confirm_password)?;
            let user = app
                .auth
                .register(RegisterRequest {
                    first_name,
                    last_name,
                    email: email.into_inner(),
                    phone,
                    password: SecretString::from(password),
                })
                .await?;
            println!("ثبت نام با موفقیت انجام شد: {}", user.email);
        }
        AuthCommand::Logout => {
            app.auth.logout()?;
            println!("از حساب کاربری خارج شدید");
        }
        AuthCommand::Whoami => {
            app.auth.initialize().await?;
            let user = app.auth.user().ok_or(CliError::NotLoggedIn)?;
            print_user(&user);
        }
        AuthCommand::Update {
            first_name,
            last_name,
            email,
            phone,
            street,
            city,
            province,
            postal_code,
            country,
        } => {
            let address_given = [&street, &city, &province, &postal_code, &country]
                .iter()
                .any(|field| field.is_some());
            let address = address_given.then(|| Address {
                street: street.unwrap_or_default(),
                city: city.unwrap_or_default(),
                state: province.unwrap_or_default(),
                postal_code: postal_code.unwrap_or_default(),
                country: country.unwrap_or_default(),
            });

            app.auth.initialize().await?;
            let updated = app.auth.update_user(UserUpdate {
                first_name,
                last_name,
                email,
                phone,
                address,
            })?;
            let user = updated.ok_or(CliError::NotLoggedIn)?;
            print_user(&user);
        }
    }
    Ok(())
}

fn check_password_confirmation(password: &str, confirmation: &str) -> Result<(), CliError> {
    if password != confirmation {
        return Err(CliError::Invalid(
            "رمز عبور و تکرار آن یکسان نیست".to_string(),
        ));
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("{} <{}>", user.full_name(), user.email);
    if !user.phone.is_empty() {
        println!("  تلفن: {}", user.phone);
    }
    if let Some(address) = &user.address {
        println!(
            "  آدرس: {}, {}, {} {}",
            address.street, address.city, address.state, address.postal_code
        );
    }
    if user.is_admin {
        println!("  نقش: مدیر");
    }
}
