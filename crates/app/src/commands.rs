//! CLI commands

use std::sync::Arc;

use clap::Subcommand;
use tradepost_application::use_cases::{
    Cart, Catalog, GetProfile, Login, LoginInput, Logout, Register, RestoreSession,
    SessionStatus, UpdateProfile,
};
use tradepost_application::{ApiResult, AuthenticatedClient};
use tradepost_domain::marketplace::{ProfileUpdate, RegistrationForm};
use tradepost_domain::{Condition, Money, ProductDraft, ProductQuery, ProductSummary, User};
use tradepost_infrastructure::{FileCredentialStore, ReqwestTransport, SystemClock, TokioFileSystem};

/// Credentials file store.
pub type Store = FileCredentialStore<TokioFileSystem>;

/// Client wired to the real transport and the credentials file.
pub type Client = AuthenticatedClient<ReqwestTransport, Store>;

/// What every command runs against.
pub struct Context {
    pub client: Arc<Client>,
    pub store: Arc<Store>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email or username
    Login {
        /// Email or username
        login: String,

        /// Password
        #[arg(long, env = "TRADEPOST_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long, env = "TRADEPOST_PASSWORD", hide_env_values = true)]
        password: String,

        /// Defaults to the password
        #[arg(long)]
        password_confirm: Option<String>,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show the stored token state without contacting the server
    Status,

    /// View or edit the profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse and manage listings
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Manage the cart and orders
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile
    Show,

    /// Change profile fields; omitted fields stay as they are
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Search available listings
    List {
        /// Text to search in title and description
        #[arg(long)]
        search: Option<String>,

        /// Category id
        #[arg(long)]
        category: Option<i64>,

        /// new, like-new, good, fair or poor
        #[arg(long)]
        condition: Option<Condition>,
    },

    /// Show one listing
    Show { id: i64 },

    /// List categories
    Categories,

    /// List your own listings
    Mine,

    /// Create a listing
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Price such as 12.50
        #[arg(long)]
        price: Money,

        /// Category id
        #[arg(long)]
        category: i64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        #[arg(long, default_value = "good")]
        condition: Condition,
    },

    /// Delete one of your listings
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show the cart and its total
    Show,

    /// Add a product
    Add {
        product: i64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove a cart line
    Remove { item: i64 },

    /// Turn the cart into an order
    Checkout,

    /// List past orders
    Orders,
}

impl Commands {
    pub async fn execute(self, context: Context) -> ApiResult<()> {
        let Context { client, store } = context;
        match self {
            Self::Login { login, password } => {
                let user = Login::new(client).execute(LoginInput { login, password }).await?;
                println!("Logged in as {}", user.display_name());
            }
            Self::Register {
                email,
                username,
                password,
                password_confirm,
                first_name,
                last_name,
            } => {
                let form = RegistrationForm {
                    email,
                    username,
                    password,
                    password_confirm,
                    first_name,
                    last_name,
                };
                let user = Register::new(client).execute(form).await?;
                println!("Welcome, {}", user.display_name());
            }
            Self::Logout => {
                Logout::new(client).execute().await?;
                println!("Logged out");
            }
            Self::Whoami => match RestoreSession::new(client).execute().await? {
                Some(user) => print_user(&user),
                None => println!("Not logged in"),
            },
            Self::Status => {
                let status = SessionStatus::new(store, SystemClock::new()).execute().await?;
                println!("{}", status.display_message());
            }
            Self::Profile { command } => command.execute(client).await?,
            Self::Products { command } => command.execute(client).await?,
            Self::Cart { command } => command.execute(client).await?,
        }
        Ok(())
    }
}

impl ProfileCommands {
    async fn execute(self, client: Arc<Client>) -> ApiResult<()> {
        let user = match self {
            Self::Show => GetProfile::new(client).execute().await?,
            Self::Update {
                first_name,
                last_name,
                phone,
                address,
            } => {
                let update = ProfileUpdate {
                    first_name,
                    last_name,
                    phone,
                    address,
                };
                UpdateProfile::new(client).execute(update).await?
            }
        };
        print_user(&user);
        Ok(())
    }
}

impl ProductCommands {
    async fn execute(self, client: Arc<Client>) -> ApiResult<()> {
        let catalog = Catalog::new(client);
        match self {
            Self::List {
                search,
                category,
                condition,
            } => {
                let query = ProductQuery {
                    search,
                    category,
                    condition,
                };
                print_products(&catalog.search(&query).await?);
            }
            Self::Show { id } => {
                let product = catalog.product(id).await?;
                println!("#{} {}", product.id, product.title);
                println!("  price:     {}", product.price);
                println!("  condition: {}", product.condition);
                println!("  quantity:  {}", product.quantity);
                if let Some(seller) = &product.seller_name {
                    println!("  seller:    {seller}");
                }
                if !product.description.is_empty() {
                    println!();
                    println!("{}", product.description);
                }
            }
            Self::Categories => {
                for category in catalog.categories().await? {
                    println!("{:>5}  {}", category.id, category.name);
                }
            }
            Self::Mine => print_products(&catalog.mine().await?),
            Self::Create {
                title,
                description,
                price,
                category,
                quantity,
                condition,
            } => {
                let mut draft = ProductDraft::new(title, description, price, category);
                draft.quantity = quantity;
                draft.condition = condition;
                let product = catalog.create(&draft).await?;
                println!("Created listing #{}", product.id);
            }
            Self::Delete { id } => {
                catalog.delete(id).await?;
                println!("Deleted listing #{id}");
            }
        }
        Ok(())
    }
}

impl CartCommands {
    async fn execute(self, client: Arc<Client>) -> ApiResult<()> {
        let cart = Cart::new(client);
        match self {
            Self::Show => {
                let view = cart.view().await?;
                if view.is_empty() {
                    println!("Cart is empty");
                    return Ok(());
                }
                for item in &view.items {
                    println!(
                        "{:>5}  {:<40} x{:<3} {:>10}",
                        item.id,
                        item.product.title,
                        item.quantity,
                        item.line_total().to_string()
                    );
                }
                println!("Total: {}", view.total);
            }
            Self::Add { product, quantity } => {
                let line = cart.add(product, quantity).await?;
                println!("Added {} x #{}", line.quantity, line.product);
            }
            Self::Remove { item } => {
                let removed = cart.remove(item).await?;
                println!("{}", removed.message.unwrap_or_else(|| format!("Removed line #{item}")));
            }
            Self::Checkout => {
                let order = cart.checkout().await?;
                println!("Order #{} placed, total {}", order.id, order.total_amount);
            }
            Self::Orders => {
                for order in cart.orders().await? {
                    println!(
                        "{:>5}  {:<12} {:>10}  {} item(s)",
                        order.id,
                        order.status,
                        order.total_amount.to_string(),
                        order.items.len()
                    );
                }
            }
        }
        Ok(())
    }
}

fn print_user(user: &User) {
    println!("{} <{}>", user.display_name(), user.email);
    println!("  username: {}", user.username);
    if let Some(phone) = &user.phone {
        println!("  phone:    {phone}");
    }
    if let Some(address) = &user.address {
        println!("  address:  {address}");
    }
}

fn print_products(products: &[ProductSummary]) {
    if products.is_empty() {
        println!("No listings found");
        return;
    }
    for product in products {
        println!(
            "{:>5}  {:<40} {:>10}  {}",
            product.id,
            product.title,
            product.price.to_string(),
            product.condition
        );
    }
}
