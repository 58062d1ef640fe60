//! Application state and the interactive session loops.

use crate::config::Config;
use crate::handlers;
use crate::ui;
use anyhow::Result;
use lostfound_core::{is_valid_username, CredentialStore, RecordStore, Registration, Session};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// What the enclosing loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Stay in the current menu.
    Continue,
    /// Leave the current menu for the login menu.
    Logout,
    /// Input is exhausted or the user asked to exit.
    Quit,
}

/// Main application model.
pub struct App<R, W> {
    pub(crate) config: Config,
    input: R,
    pub(crate) output: W,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        Self {
            config,
            input,
            output,
        }
    }

    /// Print `label` and read one line. `None` at end of input.
    pub(crate) fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub(crate) fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Run the login menu until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.say("")?;
            self.say("[Login Menu]")?;
            let Some(choice) = self.prompt("Login as User or Admin? (user/admin/quit): ")? else {
                break;
            };

            let flow = match choice.trim().to_lowercase().as_str() {
                "user" => match self.load_stores()? {
                    Some((mut users, mut items)) => self.user_session(&mut users, &mut items)?,
                    None => Flow::Continue,
                },
                "admin" => match self.load_items()? {
                    Some(mut items) => self.admin_session(&mut items)?,
                    None => Flow::Continue,
                },
                "quit" | "exit" => Flow::Quit,
                _ => {
                    self.say("Invalid choice. Try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        self.say("Goodbye.")?;
        Ok(())
    }

    /// Fresh copies of the stores, re-read at the start of every session.
    /// Unreadable files are reported and the login menu carries on.
    fn load_stores(&mut self) -> Result<Option<(CredentialStore, RecordStore)>> {
        let loaded = CredentialStore::load(&self.config.users_path).and_then(|users| {
            RecordStore::load(&self.config.items_path).map(|items| (users, items))
        });
        self.report_load_failure(loaded)
    }

    /// Admins never touch the credential file, so only items are loaded.
    fn load_items(&mut self) -> Result<Option<RecordStore>> {
        let loaded = RecordStore::load(&self.config.items_path);
        self.report_load_failure(loaded)
    }

    fn report_load_failure<T>(&mut self, loaded: lostfound_core::Result<T>) -> Result<Option<T>> {
        match loaded {
            Ok(stores) => Ok(Some(stores)),
            Err(err) => {
                tracing::error!(error = %err, "Failed to load stores");
                self.say(format!("Error: {err}. Fix or remove the file and try again."))?;
                Ok(None)
            }
        }
    }

    fn user_session(&mut self, users: &mut CredentialStore, items: &mut RecordStore) -> Result<Flow> {
        let Some(session) = self.user_login(users)? else {
            return Ok(Flow::Continue);
        };

        loop {
            ui::render_menu(&mut self.output, "User Menu", ui::USER_MENU)?;
            let Some(option) = self.prompt("Select option: ")? else {
                return Ok(Flow::Quit);
            };
            match handlers::handle_user_option(self, &session, items, option.trim())? {
                Flow::Continue => {}
                Flow::Logout => return Ok(Flow::Continue),
                Flow::Quit => return Ok(Flow::Quit),
            }
        }
    }

    /// Login or register. `None` if the user backs out or input ends.
    fn user_login(&mut self, users: &mut CredentialStore) -> Result<Option<Session>> {
        loop {
            let Some(choice) = self.prompt("Student Login or Register? (login/register/back): ")?
            else {
                return Ok(None);
            };

            match choice.trim().to_lowercase().as_str() {
                "register" => {
                    let Some(username) = self.prompt("Enter username: ")? else {
                        return Ok(None);
                    };
                    let username = username.trim().to_string();
                    if users.contains(&username) {
                        self.say("Username already exists.")?;
                        continue;
                    }
                    if !is_valid_username(&username) {
                        self.say("Usernames must be non-empty and cannot contain ':'.")?;
                        continue;
                    }
                    let Some(password) = self.prompt("Enter password: ")? else {
                        return Ok(None);
                    };
                    match users.register(&username, &password)? {
                        Registration::Created => {
                            self.say("Registration successful.")?;
                            return Ok(Some(Session::user(username)));
                        }
                        Registration::Taken => self.say("Username already exists.")?,
                        Registration::InvalidUsername => {
                            self.say("Usernames must be non-empty and cannot contain ':'.")?
                        }
                    }
                }
                "login" => {
                    let Some(username) = self.prompt("Enter username: ")? else {
                        return Ok(None);
                    };
                    let Some(password) = self.prompt("Enter password: ")? else {
                        return Ok(None);
                    };
                    let username = username.trim();
                    if users.verify(username, &password) {
                        tracing::info!(username, "User logged in");
                        self.say("Login successful.")?;
                        return Ok(Some(Session::user(username)));
                    }
                    tracing::warn!(username, "Rejected user login");
                    self.say("Invalid credentials.")?;
                }
                "back" => return Ok(None),
                _ => self.say("Invalid choice.")?,
            }
        }
    }

    fn admin_session(&mut self, items: &mut RecordStore) -> Result<Flow> {
        let Some(username) = self.prompt("Admin username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("Admin password: ")? else {
            return Ok(Flow::Quit);
        };

        let username = username.trim();
        if username != self.config.admin_username || password != self.config.admin_password {
            tracing::warn!(username, "Rejected admin login");
            self.say("Invalid admin credentials.")?;
            return Ok(Flow::Continue);
        }
        self.say("Admin login successful.")?;
        let session = Session::admin(username);

        loop {
            ui::render_menu(&mut self.output, "Admin Menu", ui::ADMIN_MENU)?;
            let Some(option) = self.prompt("Select option: ")? else {
                return Ok(Flow::Quit);
            };
            match handlers::handle_admin_option(self, &session, items, option.trim())? {
                Flow::Continue => {}
                Flow::Logout => return Ok(Flow::Continue),
                Flow::Quit => return Ok(Flow::Quit),
            }
        }
    }
}
