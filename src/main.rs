use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use edux_portal::api::PortalHttpClient;
use edux_portal::config::PortalConfig;
use edux_portal::error::AppError;
use edux_portal::router::{NAV_LINKS, Navigation, Route};
use edux_portal::session::{FileTokenStore, SessionStore};
use edux_portal::validation::ProfileField;
use edux_portal::views::{
    CourseCatalogView, EnrollAction, EnrolledCoursesView, HelpView, LoginView, Notification,
    NotificationKind, ProfileStatus, ProfileView, RegistrationView, ViewState, enrolled, profile,
};

#[derive(Debug, Parser)]
#[command(name = "edux", about = "EduX student portal from the terminal", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and keep the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new student account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        nic: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long = "confirm-password")]
        confirm_password: String,
    },
    /// Forget the stored session.
    Logout,
    /// List the course catalog.
    Courses,
    /// Enroll in a course from the catalog.
    Enroll { course_id: String },
    /// List the courses you are enrolled in.
    Enrolled,
    /// Leave a course.
    Unenroll { course_id: String },
    /// Show or edit your profile.
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Frequently asked questions and support contacts.
    Help,
    /// Render the page behind a portal path, e.g. `/courses`.
    Open { path: String },
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        nic: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    edux_portal::init_tracing("edux_portal=warn,edux=warn");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool, AppError> {
    let config = PortalConfig::new_from_env()?;
    let api = Arc::new(PortalHttpClient::new(&config)?);
    let tokens = Arc::new(FileTokenStore::new(&config.token_path));
    let session = Arc::new(SessionStore::new(api.clone(), tokens));

    match cli.command {
        Command::Login { email, password } => {
            let mut view = LoginView::new(session.clone());
            view.email = email;
            view.password = password;
            match view.submit().await {
                Some(nav) => {
                    println!("Signed in.");
                    follow(&session, nav).await
                }
                None => {
                    print_error(view.error());
                    Ok(false)
                }
            }
        }
        Command::Register {
            name,
            email,
            nic,
            phone,
            password,
            confirm_password,
        } => {
            let mut view = RegistrationView::new(api);
            view.form.name = name;
            view.form.email = email;
            view.form.nic = nic;
            view.form.phone_number = phone;
            view.form.password = password;
            view.form.confirm_password = confirm_password;
            match view.submit().await {
                Some(nav) => {
                    if let Some(msg) = view.success_message() {
                        println!("{}", msg);
                    }
                    follow(&session, nav).await
                }
                None => {
                    print_error(view.error());
                    Ok(false)
                }
            }
        }
        Command::Logout => {
            session.sign_out().await?;
            println!("Signed out.");
            Ok(true)
        }
        Command::Courses => show_catalog(&session).await,
        Command::Enroll { course_id } => {
            let mut view = CourseCatalogView::new(session.clone());
            view.load().await;
            if let Some(msg) = skipped_enroll(&course_id, view.action_for(&course_id)) {
                println!("{}", msg);
                render_catalog(&view);
                return Ok(true);
            }
            view.enroll(&course_id).await;
            let ok = print_notification(view.notification());
            render_catalog(&view);
            Ok(ok)
        }
        Command::Enrolled => show_enrolled(&session).await,
        Command::Unenroll { course_id } => {
            let mut view = EnrolledCoursesView::new(session.clone());
            view.load().await;
            if let Some(msg) = view.state().error() {
                print_load_failure(msg);
                return Ok(false);
            }
            view.unenroll(&course_id).await;
            let ok = print_notification(view.notification());
            render_enrolled(&view);
            Ok(ok)
        }
        Command::Profile { action: None } => show_profile(&session).await,
        Command::Profile {
            action:
                Some(ProfileAction::Edit {
                    name,
                    email,
                    nic,
                    phone,
                }),
        } => {
            let mut view = ProfileView::new(session.clone());
            view.load().await;
            if let ProfileStatus::Failed(msg) = view.status().await {
                print_load_failure(&msg);
                return Ok(false);
            }
            view.begin_edit().await;
            let edits = [
                (ProfileField::Name, name),
                (ProfileField::Email, email),
                (ProfileField::Nic, nic),
                (ProfileField::PhoneNumber, phone),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    view.set_field(field, value);
                }
            }
            let saved = view.save().await;
            for field in ProfileField::ALL {
                if let Some(msg) = view.field_error(field) {
                    println!("{}: {}", field.label(), msg);
                }
            }
            print_error(view.update_error());
            if let Some(n) = view.update_success() {
                println!("{}", n.message);
            }
            render_profile(&view).await;
            Ok(saved)
        }
        Command::Help => {
            render_help();
            Ok(true)
        }
        Command::Open { path } => match Route::resolve(&path) {
            Some(route) => open(&session, route).await,
            None => {
                println!("No page at {}", path);
                Ok(false)
            }
        },
    }
}

async fn follow(session: &Arc<SessionStore>, nav: Navigation) -> Result<bool, AppError> {
    if !nav.after.is_zero() {
        tokio::time::sleep(nav.after).await;
    }
    open(session, nav.to).await
}

async fn open(session: &Arc<SessionStore>, route: Route) -> Result<bool, AppError> {
    match route {
        Route::Login => {
            println!("Sign in with `edux login --email <email> --password <password>`.");
            Ok(true)
        }
        Route::Registration => {
            println!("Create an account with `edux register --help`.");
            Ok(true)
        }
        Route::Courses => show_catalog(session).await,
        Route::Home => {
            let profile_ok = show_profile(session).await?;
            let enrolled_ok = show_enrolled(session).await?;
            Ok(profile_ok && enrolled_ok)
        }
        Route::Help => {
            render_help();
            Ok(true)
        }
    }
}

async fn show_catalog(session: &Arc<SessionStore>) -> Result<bool, AppError> {
    let mut view = CourseCatalogView::new(session.clone());
    view.load().await;
    render_catalog(&view);
    Ok(view.state().error().is_none())
}

async fn show_enrolled(session: &Arc<SessionStore>) -> Result<bool, AppError> {
    let mut view = EnrolledCoursesView::new(session.clone());
    view.load().await;
    render_enrolled(&view);
    Ok(view.state().error().is_none())
}

async fn show_profile(session: &Arc<SessionStore>) -> Result<bool, AppError> {
    let mut view = ProfileView::new(session.clone());
    view.load().await;
    Ok(render_profile(&view).await)
}

fn render_nav() {
    let links: Vec<String> = NAV_LINKS
        .iter()
        .map(|l| format!("{} ({})", l.name, l.route))
        .collect();
    println!("{} | Logout", links.join(" | "));
}

/// Why `enroll` would do nothing for this course, if it would.
fn skipped_enroll(course_id: &str, action: EnrollAction) -> Option<String> {
    action
        .is_disabled()
        .then(|| format!("{}: {}", course_id, action.label()))
}

fn render_catalog(view: &CourseCatalogView) {
    if let Some(msg) = view.empty_message() {
        println!("{}", msg);
        return;
    }
    match view.state() {
        ViewState::Loading => println!("Loading available courses..."),
        ViewState::Failed(msg) => {
            println!("Failed to Load Courses");
            print_load_failure(msg);
        }
        ViewState::Ready(_) => {
            render_nav();
            println!("Available Courses");
            for row in view.rows() {
                let marker = if row.action.is_disabled() { "x" } else { " " };
                println!(
                    "[{}] {:<36} {:<30} {}",
                    marker, row.course.id, row.course.name, row.action.label()
                );
                if !row.course.description.is_empty() {
                    println!("      {}", row.course.description);
                }
            }
        }
    }
}

fn render_enrolled(view: &EnrolledCoursesView) {
    match view.state() {
        ViewState::Loading => println!("Loading your enrolled courses..."),
        ViewState::Failed(msg) => {
            println!("Failed to Load Courses");
            print_load_failure(msg);
        }
        ViewState::Ready(courses) if courses.is_empty() => {
            println!("No Enrolled Courses");
            println!("{}", enrolled::NO_ENROLLMENTS);
        }
        ViewState::Ready(courses) => {
            println!("My Enrolled Courses");
            for course in courses {
                println!(
                    "- {} ({}) enrolled {}",
                    course.name,
                    course.id,
                    course.enrolled_on().format("%Y-%m-%d")
                );
                if !course.description.is_empty() {
                    println!("  {}", course.description);
                }
            }
        }
    }
}

async fn render_profile(view: &ProfileView) -> bool {
    match view.status().await {
        ProfileStatus::Loading => {
            println!("Loading student details...");
            true
        }
        ProfileStatus::Failed(msg) => {
            println!("Error: {}", msg);
            println!("Retry with `edux profile`.");
            false
        }
        ProfileStatus::Empty => {
            println!("{}", profile::NO_STUDENT_DATA);
            false
        }
        ProfileStatus::Ready(student) => {
            let current = student.profile();
            println!("My Details");
            for field in ProfileField::ALL {
                println!("  {:<13} {}", field.label(), field.get(&current));
            }
            true
        }
    }
}

fn render_help() {
    let help = HelpView;
    println!("Help & Support");
    println!();
    println!("Frequently Asked Questions");
    for faq in help.faqs() {
        println!("  {}", faq.question);
        println!("    {}", faq.answer);
    }
    println!();
    println!("Need More Help? Reach out to our support team.");
    for contact in help.contacts() {
        println!("  {}", contact);
    }
    println!();
    println!("Quick Links");
    for link in help.quick_links() {
        match link.route {
            Some(route) => println!("  > {} (edux open {})", link.label, route),
            None => println!("  > {}", link.label),
        }
    }
}

fn print_error(msg: Option<&str>) {
    if let Some(msg) = msg {
        eprintln!("{}", msg);
    }
}

fn print_load_failure(msg: &str) {
    eprintln!("{}", msg);
    eprintln!("Try again by re-running the command.");
}

/// Prints the notification and reports whether it was a success.
fn print_notification(notification: Option<&Notification>) -> bool {
    match notification {
        Some(n) if n.kind == NotificationKind::Error => {
            eprintln!("{}", n.message);
            false
        }
        Some(n) => {
            println!("{}", n.message);
            true
        }
        None => true,
    }
}
