// ============================================================================
// cst - CiviTrack command-line client
// ============================================================================
// Usage:
//   cst submit --category pothole --description "..." --lng 35.2 --lat 31.9
//   cst mine [--search q] [--status s] [--priority p] [--sort order]
//   cst show REQUEST_ID                 Request detail + timeline + feedback
//   cst comment REQUEST_ID --text "..."
//   cst rate REQUEST_ID --stars 5
//   cst auth login|staff-login|register|logout|whoami
//   cst staff list|show|transition|priority|assign|merge|escalate|milestone
//   cst dashboard | heatmap | cohorts | agents | nearby
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use tracker_core::api::{AnalyticsApi, AuthApi, CitizensApi, OtpChannel, RequestsApi, StaffListQuery};
use tracker_core::lifecycle::{self, CommentDraft, RatingDraft, SubmissionDraft};
use tracker_core::listview::{self, ListFilter, PriorityFilter, SortOrder, StatusFilter};
use tracker_core::{
    ApiGateway, AppConfig, Category, CitizenBootstrap, CitizenCreate, MilestonePayload, Priority,
    RequestStatus, Role, ServiceRequest, SessionStore, Timeline,
};

/// CiviTrack municipal service-request client
#[derive(Parser)]
#[command(name = "cst", version, about = "Submit, track, and manage municipal service requests")]
struct Cli {
    /// Path to the session store (default: ~/.civitrack/session.redb)
    #[arg(long, global = true)]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new service request
    Submit {
        /// pothole, street_light, garbage, water_leak, road_block, trash, other
        #[arg(long)]
        category: String,

        #[arg(long)]
        description: String,

        /// P1, P2 or P3 (default P3)
        #[arg(long, default_value = "P3")]
        priority: String,

        /// Longitude of the picked location
        #[arg(long)]
        lng: Option<f64>,

        /// Latitude of the picked location
        #[arg(long)]
        lat: Option<f64>,

        /// Street name, landmark...
        #[arg(long)]
        address_hint: Option<String>,

        /// Submit with a profile instead of anonymously (needs email or phone)
        #[arg(long)]
        with_profile: bool,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// List your own requests with client-side filters
    Mine {
        /// Match against category, description, or id
        #[arg(long)]
        search: Option<String>,

        /// Exact status, or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// Exact priority, or "all"
        #[arg(long, default_value = "all")]
        priority: String,

        /// newest, oldest, or priority
        #[arg(long, default_value = "newest")]
        sort: String,
    },

    /// Show one request with its timeline and feedback controls
    Show { id: String },

    /// Comment on one of your requests
    Comment {
        id: String,

        #[arg(long)]
        text: String,
    },

    /// Rate a resolved/closed request
    Rate {
        id: String,

        #[arg(long)]
        stars: i64,

        #[arg(long)]
        comment: Option<String>,

        /// Repeatable reason code
        #[arg(long = "reason")]
        reason_codes: Vec<String>,
    },

    /// Show your citizen profile and verification state
    Profile,

    /// OTP verification for a profiled citizen
    #[command(subcommand)]
    Verify(VerifyCommands),

    /// Account registration, login, and session inspection
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Staff console
    #[command(subcommand)]
    Staff(StaffCommands),

    /// Requests near a point
    Nearby {
        #[arg(long)]
        lng: f64,

        #[arg(long)]
        lat: f64,

        #[arg(long, default_value = "1000")]
        radius_m: u32,
    },

    /// Staff KPI dashboard
    Dashboard,

    /// Staff heatmap feed summary
    Heatmap {
        /// Repeatable status filter (default: all statuses)
        #[arg(long = "status")]
        statuses: Vec<String>,
    },

    /// Staff cohort analytics (raw)
    Cohorts,

    /// Staff agent analytics (raw)
    Agents,
}

#[derive(Subcommand)]
enum VerifyCommands {
    /// Send a verification code over email or phone
    Send {
        #[arg(long, default_value = "email")]
        channel: String,
    },

    /// Confirm the received code
    Confirm {
        #[arg(long)]
        code: String,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Register a citizen account
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Citizen login (stores the bearer token)
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Staff login (stores the bearer token, switches role to staff)
    StaffLogin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Clear the stored token and role
    Logout,

    /// Show the local session and what the backend makes of it
    Whoami,
}

#[derive(Subcommand)]
enum StaffCommands {
    /// Browse all requests (server-side filters + paging)
    List {
        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "10")]
        page_size: u32,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        priority: Option<String>,
    },

    /// Staff view of one request
    Show { id: String },

    /// Move a request to another status (defaults to the adjacent next)
    Transition {
        id: String,

        /// Target status; omitted means the suggested next stage
        #[arg(long)]
        to: Option<String>,
    },

    /// Set the priority tier
    Priority {
        id: String,

        #[arg(long)]
        set: String,
    },

    /// Assign to an agent, or let the backend auto-assign
    Assign {
        id: String,

        /// Agent id; omitted triggers auto-assignment
        #[arg(long)]
        agent: Option<String>,
    },

    /// Merge a duplicate into its master request
    Merge {
        id: String,

        #[arg(long = "into")]
        master: String,
    },

    /// Bump the SLA escalation step
    Escalate { id: String },

    /// Record a field milestone (arrived, complete, ...)
    Milestone {
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        note: Option<String>,

        /// Repeatable evidence URL
        #[arg(long = "evidence")]
        evidence_urls: Vec<String>,
    },
}

struct App {
    session: Arc<SessionStore>,
    auth: AuthApi,
    citizens: CitizensApi,
    requests: RequestsApi,
    analytics: AnalyticsApi,
}

impl App {
    fn new(config: &AppConfig, db_path: Option<&str>) -> Self {
        // --db-path wins over the env-configured location
        let session = Arc::new(SessionStore::open(
            db_path.map(Path::new).or(config.db_path.as_deref()),
        ));
        let gateway = Arc::new(ApiGateway::new(config, session.clone()));
        Self {
            session,
            auth: AuthApi::new(gateway.clone()),
            citizens: CitizensApi::new(gateway.clone()),
            requests: RequestsApi::new(gateway.clone()),
            analytics: AnalyticsApi::new(gateway),
        }
    }

    /// Citizen flows run the identity bootstrap first; it never blocks.
    async fn enter_citizen_flow(&self) -> CitizenBootstrap {
        CitizenBootstrap::ensure(&self.session, &self.citizens).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let app = App::new(&config, cli.db_path.as_deref());

    match cli.command {
        Commands::Submit {
            category,
            description,
            priority,
            lng,
            lat,
            address_hint,
            with_profile,
            full_name,
            email,
            phone,
        } => {
            cmd_submit(
                &app,
                SubmitArgs {
                    category,
                    description,
                    priority,
                    lng,
                    lat,
                    address_hint,
                    with_profile,
                    full_name,
                    email,
                    phone,
                },
            )
            .await
        }
        Commands::Mine {
            search,
            status,
            priority,
            sort,
        } => cmd_mine(&app, search, &status, &priority, &sort).await,
        Commands::Show { id } => cmd_show(&app, &id).await,
        Commands::Comment { id, text } => cmd_comment(&app, &id, &text).await,
        Commands::Rate {
            id,
            stars,
            comment,
            reason_codes,
        } => cmd_rate(&app, &id, stars, comment, reason_codes).await,
        Commands::Profile => cmd_profile(&app).await,
        Commands::Verify(cmd) => cmd_verify(&app, cmd).await,
        Commands::Auth(cmd) => cmd_auth(&app, cmd).await,
        Commands::Staff(cmd) => cmd_staff(&app, cmd).await,
        Commands::Nearby { lng, lat, radius_m } => cmd_nearby(&app, lng, lat, radius_m).await,
        Commands::Dashboard => cmd_dashboard(&app).await,
        Commands::Heatmap { statuses } => cmd_heatmap(&app, statuses).await,
        Commands::Cohorts => {
            let body = app.analytics.cohorts().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Commands::Agents => {
            let body = app.analytics.agents().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
    }
}

// ============================================================================
// Citizen commands
// ============================================================================

struct SubmitArgs {
    category: String,
    description: String,
    priority: String,
    lng: Option<f64>,
    lat: Option<f64>,
    address_hint: Option<String>,
    with_profile: bool,
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

async fn cmd_submit(app: &App, args: SubmitArgs) -> Result<()> {
    let category = parse_category(&args.category)?;
    let priority = parse_priority(&args.priority)?;

    let draft = SubmissionDraft {
        category,
        description: args.description,
        priority: Some(priority),
        lng: args.lng,
        lat: args.lat,
        address_hint: args.address_hint,
        anonymous: !args.with_profile,
        email: args.email.clone(),
        phone: args.phone.clone(),
    };

    // all validation happens before any network call
    let payload = draft.validate()?;

    let bootstrap = app.enter_citizen_flow().await;
    if !bootstrap.is_identified() {
        println!("Note: continuing without a citizen identity (anonymous submission).");
    }

    // profiled submission updates the citizen record first
    if args.with_profile {
        let profile = CitizenCreate {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            anonymous: false,
        };
        let created = app.citizens.create(&profile).await?;
        app.session.set_citizen_id(&created.citizen_id);
    }

    let key = tracker_core::gateway::idempotency_key();
    let created = app.requests.create(&payload, &key).await?;

    println!("Request submitted.");
    println!("  id:       {}", created.id);
    println!("  category: {}", created.category.as_str());
    println!("  status:   {}", created.status.as_str());
    if args.with_profile {
        println!("Next: verify your contact with `cst verify send` / `cst verify confirm`.");
    }
    Ok(())
}

async fn cmd_mine(
    app: &App,
    search: Option<String>,
    status: &str,
    priority: &str,
    sort: &str,
) -> Result<()> {
    let filter = ListFilter {
        search: search.unwrap_or_default(),
        status: parse_status_filter(status)?,
        priority: parse_priority_filter(priority)?,
        sort: SortOrder::parse(sort)
            .ok_or_else(|| anyhow!("Unknown sort '{}'. Valid values: newest, oldest, priority", sort))?,
    };

    app.enter_citizen_flow().await;

    // a failed load renders as an empty list plus the error, not a crash
    let items = match app.requests.my_requests().await {
        Ok(list) => list.items,
        Err(e) => {
            eprintln!("Failed to load your requests: {}", e);
            Vec::new()
        }
    };

    let view = listview::apply(&items, &filter);
    print_request_table(&view);
    println!("\nShowing {} of {}", view.len(), items.len());
    Ok(())
}

async fn cmd_show(app: &App, id: &str) -> Result<()> {
    app.enter_citizen_flow().await;

    let request = app.requests.get(id).await?;
    print_request_detail(&request);

    match app.requests.timeline(id).await {
        Ok(timeline) => print_timeline(&timeline),
        Err(e) => eprintln!("Failed to load timeline: {}", e),
    }

    let actions = lifecycle::actions_for(request.status, Role::Citizen);
    println!();
    if actions.can_rate {
        println!("Rate this request with: cst rate {} --stars 1..5", request.id);
    } else if let Some(reason) = actions.rating_locked_reason {
        println!("{}", reason);
    }
    Ok(())
}

async fn cmd_comment(app: &App, id: &str, text: &str) -> Result<()> {
    // reject blank input before any network call
    let payload = CommentDraft::new(text).validate()?;

    app.enter_citizen_flow().await;
    app.requests.add_comment(id, &payload).await?;
    println!("Comment added.");
    Ok(())
}

async fn cmd_rate(
    app: &App,
    id: &str,
    stars: i64,
    comment: Option<String>,
    reason_codes: Vec<String>,
) -> Result<()> {
    app.enter_citizen_flow().await;

    // rating eligibility depends on the live status
    let request = app.requests.get(id).await?;
    let draft = RatingDraft {
        stars,
        comment,
        reason_codes,
    };
    let payload = draft.validate(request.status)?;

    app.requests.add_rating(id, &payload).await?;
    println!("Rating submitted ({} stars).", payload.stars);
    Ok(())
}

async fn cmd_profile(app: &App) -> Result<()> {
    let bootstrap = app.enter_citizen_flow().await;
    if !bootstrap.is_identified() {
        println!("No citizen identity yet; submit a request to get one.");
        return Ok(());
    }

    let profile = app.citizens.me().await?;
    println!("Citizen profile {}", profile.id);
    println!("  name:      {}", profile.full_name.as_deref().unwrap_or("-"));
    println!("  email:     {}", profile.email.as_deref().unwrap_or("-"));
    println!("  phone:     {}", profile.phone.as_deref().unwrap_or("-"));
    println!("  anonymous: {}", profile.anonymous);
    if let Some(verification) = &profile.verification {
        println!("  verified:  {:?}", verification.state);
    }
    Ok(())
}

async fn cmd_verify(app: &App, cmd: VerifyCommands) -> Result<()> {
    app.enter_citizen_flow().await;

    match cmd {
        VerifyCommands::Send { channel } => {
            let channel = OtpChannel::parse(&channel)
                .ok_or_else(|| anyhow!("Invalid channel '{}' (use email/phone)", channel))?;
            app.citizens.send_otp(channel).await?;
            println!("Verification code sent via {}.", channel.as_str());
        }
        VerifyCommands::Confirm { code } => {
            app.citizens.verify_otp(&code).await?;
            println!("Verification complete.");
        }
    }
    Ok(())
}

// ============================================================================
// Auth commands
// ============================================================================

async fn cmd_auth(app: &App, cmd: AuthCommands) -> Result<()> {
    match cmd {
        AuthCommands::Register { name, email, password } => {
            let response = app.auth.register(&name, &email, &password).await?;
            println!("{}", response.message.unwrap_or_else(|| "Registered.".to_string()));
        }
        AuthCommands::Login { email, password } => {
            let token = app.auth.login(&email, &password).await?;
            app.session.save_auth(&token.access_token, Role::Citizen);
            println!("Logged in as citizen {}.", email);
        }
        AuthCommands::StaffLogin { email, password } => {
            let token = app.auth.staff_login(&email, &password).await?;
            app.session.save_auth(&token.access_token, Role::Staff);
            println!("Logged in as staff {}.", email);
        }
        AuthCommands::Logout => {
            app.session.logout();
            println!("Logged out.");
        }
        AuthCommands::Whoami => {
            let role = app.session.role();
            println!("role:       {}", role.as_str());
            let citizen_id = app.session.citizen_id();
            println!(
                "citizen id: {}",
                if citizen_id.is_empty() {
                    "(none)"
                } else {
                    citizen_id.as_str()
                }
            );
            println!("logged in:  {}", app.session.is_logged_in());

            match app.auth.me().await {
                Ok(identity) => {
                    println!("backend sees: {}", serde_json::to_string(&identity)?)
                }
                Err(e) => eprintln!("backend identity lookup failed: {}", e),
            }
        }
    }
    Ok(())
}

// ============================================================================
// Staff commands
// ============================================================================

async fn cmd_staff(app: &App, cmd: StaffCommands) -> Result<()> {
    // entering the staff console switches this session's role, the same
    // way the staff pages do in the browser client
    app.session.set_role(Role::Staff);

    match cmd {
        StaffCommands::List {
            page,
            page_size,
            status,
            category,
            priority,
        } => {
            let query = StaffListQuery {
                status: status.as_deref().map(parse_status).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                page,
                page_size,
            };

            let page = match app.requests.list(&query).await {
                Ok(page) => page,
                Err(e) => {
                    eprintln!("Failed to load requests (check staff login): {}", e);
                    return Ok(());
                }
            };

            print_request_table(&page.items);
            println!(
                "\nTotal: {} | Page: {} {}{}",
                page.total,
                page.page,
                if page.has_prev() { "[prev] " } else { "" },
                if page.has_next() { "[next]" } else { "" }
            );
        }
        StaffCommands::Show { id } => {
            let request = app.requests.get(&id).await?;
            print_request_detail(&request);

            match app.requests.timeline(&id).await {
                Ok(timeline) => print_timeline(&timeline),
                Err(e) => eprintln!("Failed to load timeline: {}", e),
            }

            let actions = lifecycle::actions_for(request.status, Role::Staff);
            if let Some(next) = actions.suggested_next {
                println!();
                println!(
                    "Suggested transition: {} (cst staff transition {} --to {})",
                    next.as_str(),
                    request.id,
                    next.as_str()
                );
            }
        }
        StaffCommands::Transition { id, to } => {
            let next = match to {
                Some(s) => parse_status(&s)?,
                // default to the adjacent next stage
                None => app.requests.get(&id).await?.status.next(),
            };
            let updated = app.requests.transition(&id, next).await?;
            println!("Status updated to \"{}\".", updated.status.as_str());
        }
        StaffCommands::Priority { id, set } => {
            let priority = parse_priority(&set)?;
            let updated = app.requests.set_priority(&id, priority).await?;
            println!(
                "Priority updated to \"{}\".",
                updated.priority.map(|p| p.as_str()).unwrap_or("-")
            );
        }
        StaffCommands::Assign { id, agent } => {
            let updated = match agent {
                Some(agent_id) => app.requests.assign(&id, &agent_id).await?,
                None => app.requests.auto_assign(&id).await?,
            };
            println!(
                "Assigned to {}.",
                updated.assigned_agent_id.as_deref().unwrap_or("(pending)")
            );
        }
        StaffCommands::Merge { id, master } => {
            app.requests.merge(&id, &master).await?;
            println!("Merged {} into {}.", id, master);
        }
        StaffCommands::Escalate { id } => {
            let updated = app.requests.escalate(&id).await?;
            println!(
                "Escalated (count: {}).",
                updated.escalation_count.unwrap_or(1)
            );
        }
        StaffCommands::Milestone {
            id,
            name,
            note,
            evidence_urls,
        } => {
            let payload = MilestonePayload {
                milestone: name,
                note,
                evidence_urls,
            };
            let updated = app.requests.milestone(&id, &payload).await?;
            println!(
                "Milestone recorded; request now {}.",
                updated.status.as_str()
            );
        }
    }
    Ok(())
}

// ============================================================================
// Shared / analytics commands
// ============================================================================

async fn cmd_nearby(app: &App, lng: f64, lat: f64, radius_m: u32) -> Result<()> {
    let list = app.requests.nearby(lng, lat, radius_m).await?;
    print_request_table(&list.items);
    println!("\n{} requests within {}m", list.items.len(), radius_m);
    Ok(())
}

async fn cmd_dashboard(app: &App) -> Result<()> {
    app.session.set_role(Role::Staff);

    let kpis = match app.analytics.kpis().await {
        Ok(kpis) => kpis,
        Err(e) => {
            eprintln!("Failed to load analytics (staff access required): {}", e);
            return Ok(());
        }
    };

    println!("=== CiviTrack Dashboard ===");
    println!("Total requests: {}", kpis.total_requests);
    println!();
    for status in tracker_core::STATUS_CHAIN {
        let count = kpis.count_for(status);
        let pct = if kpis.total_requests > 0 {
            count * 100 / kpis.total_requests
        } else {
            0
        };
        println!("  {:<12} {:>5}  ({}%)", status.as_str(), count, pct);
    }
    Ok(())
}

async fn cmd_heatmap(app: &App, statuses: Vec<String>) -> Result<()> {
    app.session.set_role(Role::Staff);

    let status_in = statuses
        .iter()
        .map(|s| parse_status(s))
        .collect::<Result<Vec<_>>>()?;

    let points = app.analytics.heatmap(&status_in).await?;
    if points.is_empty() {
        println!("No heat points for the selected statuses.");
        return Ok(());
    }

    println!(
        "{:>10}  {:>10}  {:>6}",
        "LAT", "LNG", "WEIGHT"
    );
    for p in &points {
        println!("{:>10.5}  {:>10.5}  {:>6.2}", p.lat, p.lng, p.weight);
    }
    println!("\n{} heat points", points.len());
    Ok(())
}

// ============================================================================
// Parsing / rendering helpers
// ============================================================================

fn parse_status(s: &str) -> Result<RequestStatus> {
    RequestStatus::parse(s).ok_or_else(|| {
        anyhow!(
            "Unknown status '{}'. Valid values: new, triaged, assigned, in_progress, resolved, closed",
            s
        )
    })
}

fn parse_priority(s: &str) -> Result<Priority> {
    Priority::parse(s).ok_or_else(|| anyhow!("Unknown priority '{}'. Valid values: P1, P2, P3", s))
}

fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).ok_or_else(|| {
        anyhow!(
            "Unknown category '{}'. Valid values: pothole, street_light, garbage, water_leak, road_block, trash, other",
            s
        )
    })
}

fn parse_status_filter(s: &str) -> Result<StatusFilter> {
    if s.eq_ignore_ascii_case("all") {
        Ok(StatusFilter::All)
    } else {
        Ok(StatusFilter::Only(parse_status(s)?))
    }
}

fn parse_priority_filter(s: &str) -> Result<PriorityFilter> {
    if s.eq_ignore_ascii_case("all") {
        Ok(PriorityFilter::All)
    } else {
        Ok(PriorityFilter::Only(parse_priority(s)?))
    }
}

fn format_time(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn print_request_table(items: &[ServiceRequest]) {
    if items.is_empty() {
        println!("No requests found.");
        return;
    }

    println!(
        "{:<26}  {:<12}  {:<11}  {:<8}  {:<17}  {}",
        "ID", "CATEGORY", "STATUS", "PRIORITY", "CREATED", "DESCRIPTION"
    );
    println!("{}", "-".repeat(100));

    for r in items {
        println!(
            "{:<26}  {:<12}  {:<11}  {:<8}  {:<17}  {}",
            truncate(&r.id, 26),
            r.category.as_str(),
            r.status.as_str(),
            r.priority.map(|p| p.as_str()).unwrap_or("-"),
            format_time(r.created_at()),
            truncate(&r.description, 40)
        );
    }
}

fn print_request_detail(r: &ServiceRequest) {
    println!("Request: {} [{}]", r.category.as_str(), r.status.as_str());
    println!("  id:          {}", r.id);
    println!("  description: {}", r.description);
    println!(
        "  priority:    {}",
        r.priority.map(|p| p.as_str()).unwrap_or("-")
    );
    match r.location.as_ref().and_then(|l| l.lng().zip(l.lat())) {
        Some((lng, lat)) => {
            println!("  location:    {}, {}", lng, lat);
            if let Some(hint) = r.location.as_ref().and_then(|l| l.address_hint.as_deref()) {
                println!("  address:     {}", hint);
            }
        }
        None => println!("  location:    -"),
    }
    println!("  created:     {}", format_time(r.created_at()));
    if let Some(agent) = r.assigned_agent_id.as_deref() {
        println!("  agent:       {}", agent);
    }
    if let Some(feedback) = &r.citizen_feedback {
        println!(
            "  feedback:    {} stars{}",
            feedback.stars.unwrap_or(0),
            feedback
                .comment
                .as_deref()
                .map(|c| format!(": {}", c))
                .unwrap_or_default()
        );
    }
}

fn print_timeline(timeline: &Timeline) {
    println!("\nTimeline:");
    let events = timeline.newest_first();
    if events.is_empty() {
        println!("  No timeline events yet.");
        return;
    }

    for ev in events {
        println!("  [{}] {}", format_time(ev.at), ev.label());
        if ev.kind == "comment" {
            if let Some(text) = ev.meta.text.as_deref() {
                println!("      {}", text);
            }
        }
        if ev.kind == "rating" {
            if let Some(comment) = ev.meta.comment.as_deref() {
                println!("      {}", comment);
            }
        }
    }
}
