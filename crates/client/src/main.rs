//! planhaus CLI entry point.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use planhaus_client::cli::auth::AuthAction;
use planhaus_client::cli::budget::BudgetAction;
use planhaus_client::cli::cache::CacheAction;
use planhaus_client::cli::guests::GuestsAction;
use planhaus_client::cli::projects::ProjectsAction;
use planhaus_client::cli::tasks::TasksAction;
use planhaus_client::cli::vendors::VendorsAction;
use planhaus_client::cli::{Cli, Commands, OutputFormat};
use planhaus_client::output::{format_json, pretty};
use planhaus_client::{ClientConfig, Planner};
use planhaus_core::auth::Credentials;
use planhaus_core::budget::{items_for_category, NewBudgetItem};
use planhaus_core::guests::{guest_stats, search_guests, NewGuest};
use planhaus_core::projects::NewProject;
use planhaus_core::tasks::{sort_tasks_by_due, NewTask};
use planhaus_core::vendors::{NewVendor, VendorFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planhaus=info,planhaus_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    config.base_url = cli.base_url.clone();
    config.session_file = cli.session_file.clone().or_else(default_session_file);
    if cli.no_demo_fallback {
        config.demo_fallback = false;
    }
    let planner = Planner::from_config(&config).context("Failed to build API client")?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Auth(auth_cmd) => match auth_cmd.action {
            AuthAction::Demo => {
                let session = planner.auth().demo_login().await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&session.user)),
                    OutputFormat::Pretty => {
                        println!("Signed in:\n{}", pretty::format_user(&session.user))
                    }
                }
            }
            AuthAction::Login { username, password } => {
                let session = planner
                    .auth()
                    .login(&Credentials { username, password })
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&session.user)),
                    OutputFormat::Pretty => {
                        println!("Signed in:\n{}", pretty::format_user(&session.user))
                    }
                }
            }
            AuthAction::Logout => {
                planner.auth().logout().await?;
                if !cli.quiet {
                    println!("Signed out");
                }
            }
            AuthAction::Whoami => {
                let user = planner.auth().user().await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&*user)),
                    OutputFormat::Pretty => println!("{}", pretty::format_user(&user)),
                }
            }
        },
        Commands::Projects(projects_cmd) => {
            let projects = planner.projects();
            match projects_cmd.action {
                ProjectsAction::List => {
                    let list = projects.load().await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_json(&*list)),
                        OutputFormat::Pretty => println!("{}", pretty::format_projects(&list)),
                    }
                }
                ProjectsAction::Get { id } => {
                    let project = projects.get(id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_json(&*project)),
                        OutputFormat::Pretty => println!("{}", pretty::format_project(&project)),
                    }
                }
                ProjectsAction::Create {
                    name,
                    wedding_date,
                    budget,
                    guests,
                    location,
                } => {
                    let project = projects
                        .create(&NewProject {
                            name,
                            wedding_date,
                            total_budget: budget,
                            guest_count_target: guests,
                            location,
                        })
                        .await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_json(&project)),
                        OutputFormat::Pretty => {
                            println!("Created:\n{}", pretty::format_project(&project))
                        }
                    }
                }
                ProjectsAction::Delete { id } => {
                    projects.delete(id).await?;
                    if !cli.quiet {
                        println!("Deleted project {}", id);
                    }
                }
            }
        }
        Commands::Budget(budget_cmd) => match budget_cmd.action {
            BudgetAction::List {
                project_id,
                category,
            } => {
                let items = planner.budget(project_id).load().await?;
                let selected = match category.as_deref() {
                    Some(category) => items_for_category(&items, category),
                    None => items.iter().collect(),
                };
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&selected)),
                    OutputFormat::Pretty => println!("{}", pretty::format_budget_items(&selected)),
                }
            }
            BudgetAction::Summary { project_id } => {
                let project = planner.projects().get(project_id).await?;
                let overview = planner
                    .budget(project_id)
                    .overview(project.total_budget)
                    .await?;
                match cli.format {
                    OutputFormat::Json => {
                        println!("{}", format_json(&overview.summary))
                    }
                    OutputFormat::Pretty => {
                        println!("{}", pretty::format_budget_summary(&overview.summary))
                    }
                }
            }
            BudgetAction::Add {
                project_id,
                category,
                description,
                estimated,
                actual,
                paid,
                vendor,
            } => {
                let item = planner
                    .budget(project_id)
                    .create(&NewBudgetItem {
                        category,
                        description,
                        estimated_cost: estimated,
                        actual_cost: actual,
                        is_paid: paid,
                        vendor,
                        notes: None,
                    })
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&item)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_budget_item(&item))
                    }
                }
            }
            BudgetAction::Delete { project_id, id } => {
                planner.budget(project_id).delete(id).await?;
                if !cli.quiet {
                    println!("Deleted budget item {}", id);
                }
            }
        },
        Commands::Vendors(vendors_cmd) => match vendors_cmd.action {
            VendorsAction::List {
                project_id,
                search,
                category,
                status,
                sort,
                direction,
            } => {
                let filter = VendorFilter {
                    search,
                    category,
                    status: status.map(Into::into),
                };
                let vendors = planner
                    .vendors(project_id)
                    .arranged(&filter, sort.into(), direction.into())
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&vendors)),
                    OutputFormat::Pretty => println!("{}", pretty::format_vendors(&vendors)),
                }
            }
            VendorsAction::Add {
                project_id,
                name,
                category,
                status,
                contact,
                email,
                phone,
                cost,
            } => {
                let vendor = planner
                    .vendors(project_id)
                    .create(&NewVendor {
                        name,
                        category,
                        status: status.into(),
                        contact_name: contact,
                        email,
                        phone,
                        website: None,
                        cost,
                        notes: None,
                    })
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&vendor)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_vendor(&vendor))
                    }
                }
            }
            VendorsAction::Delete { project_id, id } => {
                planner.vendors(project_id).delete(id).await?;
                if !cli.quiet {
                    println!("Deleted vendor {}", id);
                }
            }
        },
        Commands::Guests(guests_cmd) => match guests_cmd.action {
            GuestsAction::List { project_id, search } => {
                let guests = planner.guests(project_id).load().await?;
                let stats = guest_stats(&guests);
                let selected = search_guests(&guests, search.as_deref().unwrap_or(""));
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&selected)),
                    OutputFormat::Pretty => {
                        println!("{}", pretty::format_guests(&selected, &stats))
                    }
                }
            }
            GuestsAction::Add {
                project_id,
                name,
                email,
                plus_one,
                table,
            } => {
                let guest = planner
                    .guests(project_id)
                    .create(&NewGuest {
                        name,
                        email,
                        rsvp_status: Default::default(),
                        plus_one,
                        table_number: table,
                        dietary_restrictions: None,
                    })
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&guest)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_guest(&guest))
                    }
                }
            }
            GuestsAction::Rsvp {
                project_id,
                id,
                status,
            } => {
                let guest = planner
                    .guests(project_id)
                    .set_rsvp(id, status.into())
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&guest)),
                    OutputFormat::Pretty => {
                        println!("Updated:\n{}", pretty::format_guest(&guest))
                    }
                }
            }
            GuestsAction::Delete { project_id, id } => {
                planner.guests(project_id).delete(id).await?;
                if !cli.quiet {
                    println!("Deleted guest {}", id);
                }
            }
        },
        Commands::Tasks(tasks_cmd) => match tasks_cmd.action {
            TasksAction::List { project_id } => {
                let mut tasks = (*planner.tasks(project_id).load().await?).clone();
                sort_tasks_by_due(&mut tasks);
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&tasks)),
                    OutputFormat::Pretty => println!("{}", pretty::format_tasks(&tasks, today)),
                }
            }
            TasksAction::Add {
                project_id,
                title,
                description,
                due,
                priority,
                category,
            } => {
                let task = planner
                    .tasks(project_id)
                    .create(&NewTask {
                        title,
                        description,
                        due_date: due,
                        priority: priority.into(),
                        category,
                    })
                    .await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&task)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_task(&task, today))
                    }
                }
            }
            TasksAction::Toggle { project_id, id } => {
                let task = planner.tasks(project_id).toggle(id).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&task)),
                    OutputFormat::Pretty => {
                        println!("Toggled:\n{}", pretty::format_task(&task, today))
                    }
                }
            }
            TasksAction::Delete { project_id, id } => {
                planner.tasks(project_id).delete(id).await?;
                if !cli.quiet {
                    println!("Deleted task {}", id);
                }
            }
            TasksAction::Stats { project_id } => {
                let stats = planner.tasks(project_id).stats(today).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&stats)),
                    OutputFormat::Pretty => println!("{}", pretty::format_timeline_stats(&stats)),
                }
            }
        },
        Commands::Dashboard { project_id, local } => {
            let dashboard = planner.dashboard(project_id);
            let stats = if local {
                dashboard.compute(today).await?
            } else {
                (*dashboard.load().await?).clone()
            };
            match cli.format {
                OutputFormat::Json => println!("{}", format_json(&stats)),
                OutputFormat::Pretty => println!("{}", pretty::format_dashboard(&stats)),
            }
        }
        Commands::Analyze { file } => {
            let analysis = planner
                .api()
                .analyze_file(&file, config.upload_max_mb, None)
                .await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_json(&analysis)),
                OutputFormat::Pretty => println!("{}", analysis.analysis),
            }
        }
        Commands::Cache(cache_cmd) => match cache_cmd.action {
            CacheAction::Clear => {
                planner.auth().clear_local_state().await?;
                if !cli.quiet {
                    println!("Cleared session and cached data");
                }
            }
        },
    }

    Ok(())
}

/// `~/.planhaus/session.json`, when a home directory is known.
fn default_session_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".planhaus").join("session.json"))
}
