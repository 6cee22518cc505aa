//! FurMeds CLI
//!
//! Thin wrapper around furmeds-core flows for command-line usage.
//!
//! ## Usage
//!
//! ```bash
//! # Sign in (password is read from stdin when not given)
//! furmeds login owner@example.com
//!
//! # List your pets
//! furmeds pets list
//!
//! # Register a pet with a photo from disk
//! furmeds pets add Rex --species dog --photo rex.jpg
//!
//! # Add a medicine given at 08:00 every second day
//! furmeds medicine add Rex Aspirin --dosage "1 pill" --time 08:00 --every-days 2
//!
//! # Share a pet with another user
//! furmeds share Rex friend@example.com
//!
//! # Accept an invite
//! furmeds invites accept <pet_id>
//!
//! # Switch the language
//! furmeds settings language de
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use furmeds_core::form::{
    FoodField, FoodFrequencyField, MedicineField, MedicineFrequencyField, PetField,
    VetAppointmentField,
};
use furmeds_core::providers::{AuthService, FileCamera, FirebaseStorage, IdentityToolkitAuth};
use furmeds_core::{
    AddPetForm, ApiClient, Decision, EmailAddress, FieldPresenter, Food,
    FoodFrequency, FoodUnit, FormPresenter, InviteList, Language, Medicine, MedicineFrequency,
    MedicineUnit, Notification, Notifier, Outcome, Pet, PetEditor, PetList, PetsApi, Prompt,
    PromptInput, Prompter, RecordId, SessionContext, Species, Storage, SubRecord, Theme,
    TimeOfDay, VetAppointment, DEFAULT_API_URL,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// FurMeds - Pet Care Tracking
#[derive(Parser)]
#[command(name = "furmeds")]
#[command(version = "0.1.0")]
#[command(about = "FurMeds - Pet Care Tracking")]
#[command(
    long_about = "Keep track of your pets' medicines, food schedules and vet appointments, and share them with the people who care for them."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Data directory (default: ~/.furmeds/data)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "FURMEDS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Web API key of the identity provider
    #[arg(long, global = true, env = "FURMEDS_FIREBASE_API_KEY", hide_env_values = true)]
    firebase_api_key: Option<String>,

    /// Object storage bucket for pet photos
    #[arg(long, global = true, env = "FURMEDS_STORAGE_BUCKET")]
    storage_bucket: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with e-mail and password
    Login {
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(long, env = "FURMEDS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        email: String,

        #[arg(long, env = "FURMEDS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Send a password reset e-mail
    ResetPassword { email: String },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Pet management
    Pets {
        #[command(subcommand)]
        action: PetsAction,
    },

    /// Medicine management
    Medicine {
        #[command(subcommand)]
        action: MedicineAction,
    },

    /// Food management
    Food {
        #[command(subcommand)]
        action: FoodAction,
    },

    /// Vet appointment management
    Vet {
        #[command(subcommand)]
        action: VetAction,
    },

    /// Invite another user to share a pet
    Share {
        /// Pet name or ID
        pet: String,

        /// E-mail address of the user to invite
        email: String,
    },

    /// Share invites addressed to you
    Invites {
        #[command(subcommand)]
        action: InvitesAction,
    },

    /// Generated reminders
    Todos {
        #[command(subcommand)]
        action: TodosAction,
    },

    /// Local preferences
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum PetsAction {
    /// List all pets
    List,

    /// Register a new pet
    Add {
        name: String,

        /// cat, dog or other
        #[arg(long)]
        species: Option<Species>,

        /// URL of an already uploaded image
        #[arg(long, conflicts_with = "photo")]
        image: Option<String>,

        /// Image file to upload as the pet's photo
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Show a pet with its medicines, foods and appointments
    Show {
        /// Pet name or ID
        pet: String,
    },

    /// Rename a pet
    Rename { pet: String, name: String },

    /// Replace a pet's photo with an image file
    Photo { pet: String, path: PathBuf },

    /// Delete a pet
    Delete { pet: String },
}

#[derive(Subcommand)]
enum MedicineAction {
    /// Add a medicine to a pet
    Add {
        pet: String,
        name: String,

        #[arg(long, default_value = "")]
        dosage: String,

        /// pills, ml, units, g or other
        #[arg(long)]
        unit: Option<MedicineUnit>,

        #[arg(long)]
        stock: Option<u32>,

        /// Time of day (HH:MM) the medicine is given; repeatable
        #[arg(long)]
        time: Vec<TimeOfDay>,

        /// Interval in days for every --time
        #[arg(long, default_value_t = 1)]
        every_days: u32,
    },

    /// Change a medicine
    Update {
        pet: String,

        /// Medicine name or ID
        medicine: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        dosage: Option<String>,

        #[arg(long)]
        unit: Option<MedicineUnit>,

        #[arg(long)]
        stock: Option<u32>,
    },

    /// Delete a medicine
    Delete { pet: String, medicine: String },
}

#[derive(Subcommand)]
enum FoodAction {
    /// Add a food to a pet
    Add {
        pet: String,
        name: String,

        #[arg(long, default_value = "")]
        dosage: String,

        /// g, bags, cans or other
        #[arg(long)]
        unit: Option<FoodUnit>,

        #[arg(long)]
        stock: Option<u32>,

        /// Feeding time (HH:MM); repeatable
        #[arg(long)]
        time: Vec<TimeOfDay>,
    },

    /// Change a food
    Update {
        pet: String,

        /// Food name or ID
        food: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        dosage: Option<String>,

        #[arg(long)]
        unit: Option<FoodUnit>,

        #[arg(long)]
        stock: Option<u32>,
    },

    /// Delete a food
    Delete { pet: String, food: String },
}

#[derive(Subcommand)]
enum VetAction {
    /// Add a vet appointment
    Add { pet: String, name: String },

    /// Delete a vet appointment
    Delete { pet: String, appointment: String },
}

#[derive(Subcommand)]
enum InvitesAction {
    /// List open invites
    List,

    /// Accept the invite for a pet
    Accept { pet_id: String },

    /// Deny the invite for a pet
    Deny { pet_id: String },
}

#[derive(Subcommand)]
enum TodosAction {
    /// List reminders
    List,

    /// Generate reminders from the schedules
    Generate,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show language and theme
    Show,

    /// Set the language (en, de)
    Language { language: Language },

    /// Set the theme (light, dark, system)
    Theme { theme: Theme },
}

// ═══════════════════════════════════════════════════════════════════════
// Terminal prompts and notifications
// ═══════════════════════════════════════════════════════════════════════

/// Asks confirmations on stdin
struct TerminalPrompter {
    assume_yes: bool,
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn ask(&self, prompt: &Prompt) -> Decision {
        if self.assume_yes && prompt.input.is_none() {
            return Decision::Confirm { input: None };
        }

        if let Some(header) = &prompt.header {
            eprintln!("{}", header);
        }
        match prompt.input {
            Some(PromptInput::Email) => eprint!("{}: ", prompt.message),
            None => eprint!("{} [y/N] ", prompt.message),
        }

        let Some(answer) = read_line().await else {
            return Decision::Cancel;
        };
        match prompt.input {
            Some(_) if !answer.is_empty() => Decision::Confirm {
                input: Some(answer),
            },
            Some(_) => Decision::Cancel,
            None if matches!(answer.to_lowercase().as_str(), "y" | "yes") => {
                Decision::Confirm { input: None }
            }
            None => Decision::Cancel,
        }
    }
}

/// Answers an input prompt with a value given on the command line,
/// after a yes/no confirmation through `confirmer`
struct GivenInput<P> {
    value: String,
    confirmer: P,
}

#[async_trait]
impl<P: Prompter> Prompter for GivenInput<P> {
    async fn ask(&self, prompt: &Prompt) -> Decision {
        if prompt.input.is_none() {
            return self.confirmer.ask(prompt).await;
        }

        let mut check = Prompt::new(format!("{} {}?", prompt.message, self.value));
        check.header = prompt.header.clone();
        match self.confirmer.ask(&check).await {
            Decision::Confirm { .. } => Decision::Confirm {
                input: Some(self.value.clone()),
            },
            Decision::Cancel => Decision::Cancel,
        }
    }
}

/// Prints notifications to stderr
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", notification);
    }
}

async fn read_line() -> Option<String> {
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    match stdin.read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Add-pet form filled from the command line, uploading the photo (if
/// any) under the new pet's identity before saving.
struct CommandLineAddPet {
    fields: Vec<PetField>,
    photo: Option<(FileCamera, FirebaseStorage)>,
    user_uid: String,
}

#[async_trait]
impl FormPresenter<AddPetForm> for CommandLineAddPet {
    async fn present(&self, mut form: AddPetForm) -> Outcome<AddPetForm> {
        for field in &self.fields {
            form.apply(field.clone());
        }
        if let Some((camera, storage)) = &self.photo {
            let pet_id = form.draft().id;
            match furmeds_core::flows::capture_and_upload(camera, storage, &self.user_uid, &pet_id)
                .await
            {
                Ok(url) => form.apply(PetField::Image(url)),
                Err(e) => {
                    StderrNotifier.notify(Notification::request_failed("Uploading photo", &e));
                    return Outcome::Cancelled;
                }
            }
        }
        Outcome::Saved(form)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Get the default data directory (~/.furmeds/data)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".furmeds")
        .join("data")
}

fn parse_pet_id(s: &str) -> Result<RecordId> {
    RecordId::parse(s).map_err(|e| anyhow!("Invalid pet ID '{}': {}", s, e))
}

fn require_user(session: &SessionContext) -> Result<String> {
    session
        .user_uid()
        .ok_or_else(|| anyhow!("Not signed in; run `furmeds login <email>` first"))
}

async fn read_password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    eprint!("Password: ");
    read_line()
        .await
        .filter(|p| !p.is_empty())
        .context("No password given")
}

fn auth_service(
    cli_key: Option<String>,
    session: &SessionContext,
) -> Result<AuthService<IdentityToolkitAuth>> {
    let key = cli_key.context("No identity provider key configured (--firebase-api-key)")?;
    Ok(AuthService::new(IdentityToolkitAuth::new(key), session.clone()))
}

fn photo_storage(bucket: Option<String>, session: &SessionContext) -> Result<FirebaseStorage> {
    let bucket = bucket.context("No storage bucket configured (--storage-bucket)")?;
    Ok(FirebaseStorage::new(bucket, session.clone()))
}

/// Find a sub-record by ID or by its label (case-insensitive)
fn find_record<R: SubRecord>(records: &[R], key: &str) -> Result<RecordId> {
    let by_id = RecordId::parse(key).ok();
    records
        .iter()
        .find(|r| Some(*r.id()) == by_id || r.label().eq_ignore_ascii_case(key.trim()))
        .map(|r| *r.id())
        .ok_or_else(|| anyhow!("No {} '{}'", R::KIND, key))
}

/// Load the pet list and open `key` for editing
async fn open_editor(
    list: &mut PetList,
    key: &str,
    api: &Arc<dyn PetsApi>,
    notifier: &Arc<dyn Notifier>,
) -> Result<PetEditor> {
    list.refresh().await;
    let pet = list
        .find(key)
        .cloned()
        .ok_or_else(|| anyhow!("No pet '{}'", key))?;
    Ok(PetEditor::open(pet, api.clone(), notifier.clone()))
}

fn print_pet_line(pet: &Pet) {
    let species = pet.species.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
    println!("{}  {} ({})", pet.id, pet.name, species);
}

fn print_pet(pet: &Pet) {
    println!("Pet: {}", pet.name);
    println!("  ID: {}", pet.id);
    if let Some(species) = pet.species {
        println!("  Species: {}", species);
    }
    if let Some(image) = &pet.image {
        println!("  Image: {}", image);
    }
    if !pet.shared_with.is_empty() {
        let users: Vec<_> = pet
            .shared_with
            .iter()
            .map(|s| {
                if s.share_accepted {
                    s.user_uid.clone()
                } else {
                    format!("{} (pending)", s.user_uid)
                }
            })
            .collect();
        println!("  Shared with: {}", users.join(", "));
    }

    println!();
    println!("Medicines:");
    for m in pet.medicines() {
        let unit = m.unit.map(|u| format!(" {}", u)).unwrap_or_default();
        println!("  {}  {} - {}{}", m.id, m.name, m.dosage, unit);
        for f in &m.frequencies {
            println!("      at {} every {} day(s)", f.time, f.every_days);
        }
    }

    println!("Foods:");
    for food in pet.foods() {
        let unit = food.unit.map(|u| format!(" {}", u)).unwrap_or_default();
        println!("  {}  {} - {}{}", food.id, food.name, food.dosage, unit);
        for f in &food.frequencies {
            println!("      at {}", f.time);
        }
    }

    println!("Vet appointments:");
    for v in pet.vet_appointments() {
        println!("  {}  {}", v.id, v.name);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let storage = Storage::new(data_dir.join("furmeds.redb"))?;
    let session = SessionContext::load(storage)?;
    debug!(data_dir = %data_dir.display(), api_url = %cli.api_url, "Starting");

    let api: Arc<dyn PetsApi> = Arc::new(ApiClient::new(cli.api_url.clone(), session.clone()));
    let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);
    let prompter = TerminalPrompter {
        assume_yes: cli.yes,
    };
    let mut pets = PetList::new(api.clone(), notifier.clone());

    match cli.command {
        Commands::Login { email, password } => {
            let email = EmailAddress::parse(&email)?;
            let password = read_password(password).await?;
            let auth = auth_service(cli.firebase_api_key, &session)?;
            let signed_in = auth.sign_in(&email, &password).await?;
            println!("Signed in as {}", signed_in.email);
        }

        Commands::Signup { email, password } => {
            let email = EmailAddress::parse(&email)?;
            let password = read_password(password).await?;
            let auth = auth_service(cli.firebase_api_key, &session)?;
            let created = auth.sign_up(&email, &password).await?;
            println!("Account created for {}", created.email);
        }

        Commands::ResetPassword { email } => {
            let email = EmailAddress::parse(&email)?;
            let auth = auth_service(cli.firebase_api_key, &session)?;
            auth.reset_password(&email).await?;
            println!("Password reset e-mail sent to {}", email);
        }

        Commands::Logout => {
            session.clear_session()?;
            println!("Signed out");
        }

        Commands::Whoami => match session.session() {
            Some(s) => {
                println!("Signed in as {}", s.email);
                println!("  User: {}", s.user_uid);
            }
            None => println!("Not signed in"),
        },

        Commands::Pets { action } => match action {
            PetsAction::List => {
                pets.refresh().await;
                if pets.pets().is_empty() {
                    println!("No pets.");
                } else {
                    for pet in pets.pets() {
                        print_pet_line(pet);
                    }
                }
            }

            PetsAction::Add {
                name,
                species,
                image,
                photo,
            } => {
                let user_uid = require_user(&session)?;
                let mut fields = vec![PetField::Name(name)];
                fields.extend(species.map(PetField::Species));
                fields.extend(image.map(PetField::Image));
                let photo = match photo {
                    Some(path) => Some((
                        FileCamera::new(path),
                        photo_storage(cli.storage_bucket, &session)?,
                    )),
                    None => None,
                };

                let presenter = CommandLineAddPet {
                    fields,
                    photo,
                    user_uid: user_uid.clone(),
                };
                match pets.add_pet(&presenter, &user_uid).await? {
                    Outcome::Saved(pet) => {
                        println!("Added pet: {}", pet.name);
                        println!("  ID: {}", pet.id);
                    }
                    _ => bail!("Pet was not added"),
                }
            }

            PetsAction::Show { pet } => {
                let editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                print_pet(editor.pet());
            }

            PetsAction::Rename { pet, name } => {
                let id = open_editor(&mut pets, &pet, &api, &notifier).await?.pet().id;
                let presenter = FieldPresenter::new(vec![PetField::Name(name.clone())]);
                pets.open_pet(&id, &presenter, &prompter).await?;
                println!("Renamed to {}", name);
            }

            PetsAction::Photo { pet, path } => {
                let user_uid = require_user(&session)?;
                let storage = photo_storage(cli.storage_bucket, &session)?;
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let url = editor
                    .add_picture(&FileCamera::new(path), &storage, &user_uid)
                    .await?;
                pets.save(editor.pet()).await?;
                println!("Photo uploaded: {}", url);
            }

            PetsAction::Delete { pet } => {
                pets.refresh().await;
                let id = pets
                    .find(&pet)
                    .map(|p| p.id)
                    .ok_or_else(|| anyhow!("No pet '{}'", pet))?;
                if pets.delete_pet(&prompter, &id).await? {
                    println!("Deleted {}", pet);
                } else {
                    println!("Cancelled");
                }
            }
        },

        Commands::Medicine { action } => match action {
            MedicineAction::Add {
                pet,
                name,
                dosage,
                unit,
                stock,
                time,
                every_days,
            } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let presenter = FieldPresenter::new(vec![
                    MedicineField::Name(name),
                    MedicineField::Dosage(dosage),
                    MedicineField::Unit(unit),
                    MedicineField::Stock(stock),
                ]);
                let medicine = editor
                    .edit_record::<Medicine, _, _>(&presenter, &prompter, None)
                    .await?
                    .saved()
                    .context("Medicine was not added")?;
                for t in time {
                    let schedule = FieldPresenter::new(vec![
                        MedicineFrequencyField::Time(t),
                        MedicineFrequencyField::EveryDays(every_days),
                    ]);
                    editor
                        .edit_frequency::<Medicine, MedicineFrequency, _, _>(
                            &medicine.id,
                            &schedule,
                            &prompter,
                            None,
                        )
                        .await?;
                }
                pets.save(editor.pet()).await?;
                println!("Added medicine: {}", medicine.name);
                println!("  ID: {}", medicine.id);
            }

            MedicineAction::Update {
                pet,
                medicine,
                name,
                dosage,
                unit,
                stock,
            } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let id = find_record(editor.pet().medicines(), &medicine)?;
                let mut fields = Vec::new();
                fields.extend(name.map(MedicineField::Name));
                fields.extend(dosage.map(MedicineField::Dosage));
                fields.extend(unit.map(|u| MedicineField::Unit(Some(u))));
                fields.extend(stock.map(|s| MedicineField::Stock(Some(s))));

                editor
                    .edit_record::<Medicine, _, _>(&FieldPresenter::new(fields), &prompter, Some(&id))
                    .await?;
                pets.save(editor.pet()).await?;
                println!("Updated medicine {}", id);
            }

            MedicineAction::Delete { pet, medicine } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let id = find_record(editor.pet().medicines(), &medicine)?;
                match editor.delete_record::<Medicine, _>(&prompter, &id).await {
                    Some(removed) => {
                        pets.save(editor.pet()).await?;
                        println!("Deleted medicine {}", removed.name);
                    }
                    None => println!("Cancelled"),
                }
            }
        },

        Commands::Food { action } => match action {
            FoodAction::Add {
                pet,
                name,
                dosage,
                unit,
                stock,
                time,
            } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let presenter = FieldPresenter::new(vec![
                    FoodField::Name(name),
                    FoodField::Dosage(dosage),
                    FoodField::Unit(unit),
                    FoodField::Stock(stock),
                ]);
                let food = editor
                    .edit_record::<Food, _, _>(&presenter, &prompter, None)
                    .await?
                    .saved()
                    .context("Food was not added")?;
                for t in time {
                    let schedule = FieldPresenter::new(vec![FoodFrequencyField::Time(t)]);
                    editor
                        .edit_frequency::<Food, FoodFrequency, _, _>(
                            &food.id,
                            &schedule,
                            &prompter,
                            None,
                        )
                        .await?;
                }
                pets.save(editor.pet()).await?;
                println!("Added food: {}", food.name);
                println!("  ID: {}", food.id);
            }

            FoodAction::Update {
                pet,
                food,
                name,
                dosage,
                unit,
                stock,
            } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let id = find_record(editor.pet().foods(), &food)?;
                let mut fields = Vec::new();
                fields.extend(name.map(FoodField::Name));
                fields.extend(dosage.map(FoodField::Dosage));
                fields.extend(unit.map(|u| FoodField::Unit(Some(u))));
                fields.extend(stock.map(|s| FoodField::Stock(Some(s))));

                editor
                    .edit_record::<Food, _, _>(&FieldPresenter::new(fields), &prompter, Some(&id))
                    .await?;
                pets.save(editor.pet()).await?;
                println!("Updated food {}", id);
            }

            FoodAction::Delete { pet, food } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let id = find_record(editor.pet().foods(), &food)?;
                match editor.delete_record::<Food, _>(&prompter, &id).await {
                    Some(removed) => {
                        pets.save(editor.pet()).await?;
                        println!("Deleted food {}", removed.name);
                    }
                    None => println!("Cancelled"),
                }
            }
        },

        Commands::Vet { action } => match action {
            VetAction::Add { pet, name } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let presenter = FieldPresenter::new(vec![VetAppointmentField::Name(name)]);
                let appointment = editor
                    .edit_record::<VetAppointment, _, _>(&presenter, &prompter, None)
                    .await?
                    .saved()
                    .context("Appointment was not added")?;
                pets.save(editor.pet()).await?;
                println!("Added vet appointment: {}", appointment.name);
                println!("  ID: {}", appointment.id);
            }

            VetAction::Delete { pet, appointment } => {
                let mut editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
                let id = find_record(editor.pet().vet_appointments(), &appointment)?;
                match editor.delete_record::<VetAppointment, _>(&prompter, &id).await {
                    Some(removed) => {
                        pets.save(editor.pet()).await?;
                        println!("Deleted vet appointment {}", removed.name);
                    }
                    None => println!("Cancelled"),
                }
            }
        },

        Commands::Share { pet, email } => {
            let editor = open_editor(&mut pets, &pet, &api, &notifier).await?;
            let prompter = GivenInput {
                value: email,
                confirmer: prompter,
            };
            match editor.invite_user(&prompter).await? {
                Some(email) => println!("Invited {} to share {}", email, editor.pet().name),
                None => println!("Cancelled"),
            }
        }

        Commands::Invites { action } => {
            let mut invites = InviteList::new(api.clone(), notifier.clone());
            match action {
                InvitesAction::List => {
                    invites.load().await;
                    if invites.is_empty() {
                        println!("No open invites.");
                    }
                    for invite in invites.invites() {
                        println!(
                            "{}  {} (from {})",
                            invite.pet.id, invite.pet.name, invite.owner_email
                        );
                    }
                }
                InvitesAction::Accept { pet_id } => {
                    let id = parse_pet_id(&pet_id)?;
                    invites.accept(&id).await?;
                    println!("Accepted invite for {}", id);
                }
                InvitesAction::Deny { pet_id } => {
                    let id = parse_pet_id(&pet_id)?;
                    invites.deny(&id).await?;
                    println!("Denied invite for {}", id);
                }
            }
        }

        Commands::Todos { action } => match action {
            TodosAction::List => {
                let todos = api.list_todos().await?;
                if todos.is_empty() {
                    println!("Nothing to do.");
                }
                for todo in todos {
                    let mark = if todo.done { "✓" } else { "○" };
                    println!("{} {}", mark, todo.text);
                }
            }
            TodosAction::Generate => {
                api.generate_todos().await?;
                println!("Reminders generated");
            }
        },

        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let language = session.language();
                println!("Language: {} ({})", language, language.code());
                println!("Theme: {}", session.theme());
                println!("Data directory: {}", data_dir.display());
            }
            SettingsAction::Language { language } => {
                session.set_language(language)?;
                println!("Language: {}", language);
            }
            SettingsAction::Theme { theme } => {
                session.set_theme(theme)?;
                println!("Theme: {}", theme);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use furmeds_core::FixedPrompter;

    #[tokio::test]
    async fn test_given_input_needs_confirmation() {
        let declined = GivenInput {
            value: "friend@example.com".to_string(),
            confirmer: FixedPrompter::cancel(),
        };
        assert_eq!(
            declined.ask(&Prompt::share_pet("Rex")).await,
            Decision::Cancel
        );

        let accepted = GivenInput {
            value: "friend@example.com".to_string(),
            confirmer: FixedPrompter::confirm(),
        };
        assert_eq!(
            accepted.ask(&Prompt::share_pet("Rex")).await,
            Decision::Confirm {
                input: Some("friend@example.com".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_given_input_passes_plain_confirmations_through() {
        let prompter = GivenInput {
            value: "friend@example.com".to_string(),
            confirmer: FixedPrompter::cancel(),
        };
        assert_eq!(
            prompter.ask(&Prompt::delete_pet("Rex")).await,
            Decision::Cancel
        );
    }

    #[tokio::test]
    async fn test_assume_yes_skips_yes_no_prompts() {
        let prompter = GivenInput {
            value: "friend@example.com".to_string(),
            confirmer: TerminalPrompter { assume_yes: true },
        };
        assert_eq!(
            prompter.ask(&Prompt::share_pet("Rex")).await,
            Decision::Confirm {
                input: Some("friend@example.com".to_string())
            }
        );
    }
}
