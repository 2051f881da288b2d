mod config;

use std::sync::Arc;
use storefront::cart::ShoppingCart;
use storefront::catalog::{Catalog, Product};
use storefront::debounced_search::DebouncedSearch;
use storefront::global_search::GlobalSearch;
use storefront::{AsyncResource, State};
use storefront_async::CancellationToken;
use trace_err::*;
use tracing::{error, info, warn};

fn init_logger(log_level: &str) {
    let log_level = if log_level.is_empty() { "info" } else { log_level }
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .trace_expect("Invalid log level");

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(log_level > tracing_subscriber::filter::LevelFilter::INFO)
        .init();
}

fn listen_for_cancel(cancel_token: CancellationToken) {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            let mut term_handler =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .trace_expect("Failed to register signal handlers");
        } else {
            let mut term_handler = std::future::pending::<()>();
        }
    }
    tokio::spawn(async move {
        cfg_if::cfg_if! {
            if #[cfg(unix)] {
                let terminated = term_handler.recv();
            } else {
                let terminated = &mut term_handler;
            }
        }
        tokio::select! {
            _ = terminated => {
                info!("Received terminate signal, stopping...");
                cancel_token.cancel();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received CTRL+C, stopping...");
                cancel_token.cancel();
            }
            _ = cancel_token.cancelled() => {}
        }
    });
}

// Loads `resource`, giving up early if the process is asked to stop
async fn load<T>(
    resource: &AsyncResource<T>,
    cancel_token: &CancellationToken,
) -> State<T, storefront::Error>
where
    T: Send + Sync + 'static,
{
    tokio::select! {
        () = resource.load() => {}
        _ = cancel_token.cancelled() => resource.cancel(),
    }
    resource.state()
}

fn print_product(product: &Product) {
    println!("  [{}] {:<24} {}", product.id, product.name, product.price);
}

#[tokio::main]
async fn main() {
    // Parse command line
    let Some((config, config_source)) = config::init() else {
        return;
    };

    init_logger(&config.log_level);
    info!(
        "{} version {} starting...",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    info!("{config_source}");

    let cancel_token = CancellationToken::new();
    listen_for_cancel(cancel_token.clone());

    let catalog = Arc::new(Catalog::new(&config.storefront));
    let mut cart = ShoppingCart::new();

    let products = catalog.products_resource();
    match load(&products, &cancel_token).await {
        State::Success(products) if products.is_empty() => println!("The catalogue is empty"),
        State::Success(products) => {
            println!("Products:");
            for product in products.iter() {
                print_product(product);
                cart.add_item(product);
            }
        }
        State::Error(e) => error!("Failed to load products: {e}"),
        State::Idle | State::Loading => {
            info!("Stopped");
            return;
        }
    }

    if let Some(id) = &config.product {
        let product = catalog.product_resource(id.clone());
        match load(&product, &cancel_token).await {
            State::Success(product) => {
                println!("Product {id}:");
                print_product(&product);
                cart.add_item(&product);
            }
            State::Error(e) => warn!("{e}"),
            State::Idle | State::Loading => {
                info!("Stopped");
                return;
            }
        }
    }

    println!(
        "Cart: {} item(s) in {} line(s), subtotal {}",
        cart.item_count(),
        cart.items().len(),
        cart.subtotal()
    );

    if let Some(query) = &config.query {
        let search = Arc::new(GlobalSearch::from_config(&config.storefront));
        let debounced = DebouncedSearch::from_config(&config.storefront);

        // Type the query one keystroke at a time; only the last one searches
        let mut typed = String::new();
        for c in query.chars() {
            typed.push(c);
            let search = search.clone();
            debounced.search(typed.clone(), move |q| async move {
                _ = search.perform(q).await;
            });
        }

        tokio::select! {
            () = debounced.waiter().settled() => {
                println!("Search results for '{}':", search.last_query().unwrap_or_default());
                for result in search.results() {
                    println!("  [{}] {}", result.id, result.title);
                }
            }
            _ = cancel_token.cancelled() => {
                debounced.cancel();
                search.cancel_all();
            }
        }
        search.shutdown().await;
    }

    cancel_token.cancel();
    info!("Stopped");
}
