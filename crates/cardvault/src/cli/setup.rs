use cardvaultapp::model::CardForm;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cardvault",
    bin_name = "cardvault",
    version,
    disable_help_subcommand = true,
    after_help = "Enable shell completions:\n  eval \"$(cardvault completions bash)\"  # add to ~/.bashrc\n  eval \"$(cardvault completions zsh)\"   # add to ~/.zshrc"
)]
#[command(about = "Author and keep a personal collection of trading cards", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $CARDVAULT_DATA, then the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new card
    #[command(alias = "new", display_order = 1)]
    Add(CardArgs),

    /// Change fields of an existing card
    #[command(alias = "e", display_order = 2)]
    Edit {
        /// Card id
        id: String,

        #[command(flatten)]
        card: CardArgs,
    },

    /// Show one card in full
    #[command(alias = "v", display_order = 3)]
    Show {
        /// Card id
        id: String,
    },

    /// Delete a card
    #[command(alias = "delete", display_order = 4)]
    Rm {
        /// Card id
        id: String,
    },

    /// List the collection, newest first
    #[command(alias = "ls", display_order = 10)]
    List,

    /// Search by text, author and type
    #[command(display_order = 11)]
    Search {
        /// Matches name, description and ability name (case-insensitive)
        query: Option<String>,

        /// Exact author
        #[arg(long)]
        author: Option<String>,

        /// Exact type, in either slot
        #[arg(long = "type", value_name = "TYPE")]
        card_type: Option<String>,
    },

    /// Collection statistics
    #[command(display_order = 12)]
    Stats,

    /// Export the collection to a JSON document
    #[command(display_order = 20)]
    Export {
        /// Output file ("-" for stdout). Defaults to <prefix>-YYYY-MM-DD.json
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import cards from an export document (every card gets a new id)
    #[command(display_order = 21)]
    Import {
        /// Document to import ("-" for stdin)
        file: PathBuf,
    },

    /// Compare the card store with its backup mirror
    #[command(display_order = 30)]
    Doctor,

    /// Delete every card
    #[command(display_order = 31)]
    Clear {
        /// Confirm deleting the whole collection
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Generate shell completions
    #[command(display_order = 40)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Card fields as flags. Only the flags given are part of the form.
#[derive(Args, Debug, Clone, Default)]
pub struct CardArgs {
    /// Card name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Who made the card
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Primary type (default: Normal)
    #[arg(long = "type1", visible_alias = "type", value_name = "TYPE")]
    pub type1: Option<String>,

    /// Secondary type (dropped if equal to the primary)
    #[arg(long = "type2", value_name = "TYPE")]
    pub type2: Option<String>,

    /// Flavor text
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Hit points (default 60)
    #[arg(long)]
    pub hp: Option<String>,

    /// Attack (default 40)
    #[arg(long)]
    pub attack: Option<String>,

    /// Defense (default 30)
    #[arg(long)]
    pub defense: Option<String>,

    #[arg(long)]
    pub weakness: Option<String>,

    #[arg(long)]
    pub resistance: Option<String>,

    /// Ability name
    #[arg(long = "ability", value_name = "NAME")]
    pub ability_name: Option<String>,

    /// Ability description
    #[arg(long = "ability-text", value_name = "TEXT")]
    pub ability_description: Option<String>,

    /// Image as an opaque string (URL or data URI)
    #[arg(long)]
    pub image: Option<String>,
}

impl CardArgs {
    pub fn into_form(self) -> CardForm {
        CardForm {
            name: self.name,
            author: self.author,
            type1: self.type1,
            type2: self.type2,
            description: self.description,
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            weakness: self.weakness,
            resistance: self.resistance,
            ability_name: self.ability_name,
            ability_description: self.ability_description,
            image: self.image,
        }
    }
}

/// Builds the clap Command, for completion generation.
pub fn build_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn naked_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["cardvault"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn add_collects_card_fields() {
        let cli = Cli::try_parse_from([
            "cardvault", "add", "--name", "Volt", "--type", "Electric", "--hp", "70",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                let form = args.into_form();
                assert_eq!(form.name.as_deref(), Some("Volt"));
                assert_eq!(form.type1.as_deref(), Some("Electric"));
                assert_eq!(form.hp.as_deref(), Some("70"));
                assert!(form.author.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn edit_takes_id_and_partial_fields() {
        let cli = Cli::try_parse_from(["cardvault", "edit", "abc", "--attack", "99"]).unwrap();
        match cli.command {
            Some(Commands::Edit { id, card }) => {
                assert_eq!(id, "abc");
                assert_eq!(card.attack.as_deref(), Some("99"));
                assert!(card.name.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn search_filters_and_global_flags() {
        let cli = Cli::try_parse_from([
            "cardvault", "search", "fire", "--author", "Ash", "--type", "Fire", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::Search {
                query,
                author,
                card_type,
            }) => {
                assert_eq!(query.as_deref(), Some("fire"));
                assert_eq!(author.as_deref(), Some("Ash"));
                assert_eq!(card_type.as_deref(), Some("Fire"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rm_requires_an_id() {
        assert!(Cli::try_parse_from(["cardvault", "rm"]).is_err());
    }
}
