use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Keep the credential token across browser restarts
        #[arg(long)]
        remember: bool,
    },

    /// Sign out and purge stored session data
    Logout,

    /// Show the current merged identity
    Whoami {
        /// Image to use when none is held in memory
        #[arg(long)]
        image: Option<String>,
    },

    /// Update the profile on the server, then persist it
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// New profile image URL or data URI
        #[arg(long)]
        image: Option<String>,
    },

    /// Give the profile image a fresh cache-bust token
    RefreshImage,

    /// Simulate closing the browser (clears the session store)
    CloseBrowser,
}
