//! Operaciones contra PostgreSQL real.
//!
//! Cada test recibe una base nueva con las migraciones aplicadas
//! (`DATABASE_URL` debe apuntar a un servidor donde se puedan crear bases).

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::PgPool;

use control_charolas::controllers::client_controller::ClientController;
use control_charolas::controllers::courier_controller::CourierController;
use control_charolas::controllers::movement_controller::MovementController;
use control_charolas::controllers::route_controller::RouteController;
use control_charolas::controllers::supplier_controller::SupplierController;
use control_charolas::controllers::warehouse_controller::WarehouseController;
use control_charolas::dto::ApiResponse;
use control_charolas::middleware::auth::AuthenticatedUser;
use control_charolas::models::supplier::SupplierMovementKind;
use control_charolas::models::trays::TrayCounts;
use control_charolas::models::user::UserRole;
use control_charolas::repositories::client_repository::ClientRepository;
use control_charolas::repositories::supplier_repository::{NewSupplierMovement, SupplierRepository};
use control_charolas::repositories::warehouse_repository::WarehouseRepository;
use control_charolas::utils::errors::AppError;

#[sqlx::test(migrations = "./migrations")]
async fn test_route_start_without_stock_writes_nothing(pool: PgPool) {
    let admin = admin();
    stock_warehouse(&pool, 10, 10).await;
    let courier_id = create_courier(&pool).await;
    let before = WarehouseRepository::new(pool.clone()).current().await.unwrap();

    let result = RouteController::new(pool.clone())
        .start(
            request(json!({"code": "R-001", "name": "Centro", "courier_id": courier_id, "large": 20, "small": 0})),
            &admin,
        )
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock(_))));

    let after = WarehouseRepository::new(pool.clone()).current().await.unwrap();
    assert_eq!(after.version, before.version);
    assert_eq!(after.counts(), TrayCounts::new(10, 10));
    assert_eq!(count(&pool, "warehouse_history").await, 1);
    assert_eq!(count(&pool, "delivery_routes").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_movement_moves_trays_between_route_and_client(pool: PgPool) {
    let operator = operator();
    stock_warehouse(&pool, 100, 50).await;
    let route_id = start_route(&pool, "R-001", 30, 20).await;
    create_client(&pool, "CLI-001").await;

    let created = data(
        MovementController::new(pool.clone())
            .create(
                request(json!({
                    "route_id": route_id, "client_code": "CLI-001",
                    "dropped_large": 5, "dropped_small": 2, "picked_large": 1,
                    "prior_large": 0, "prior_small": 0
                })),
                &operator,
            )
            .await
            .unwrap(),
    );

    assert_eq!(created.client_balance, TrayCounts::new(4, 2));
    assert_eq!(created.route_current, TrayCounts::new(26, 18));

    let route = data(RouteController::new(pool.clone()).get(route_id).await.unwrap());
    assert_eq!(route.current(), TrayCounts::new(26, 18));

    let prior = data(ClientController::new(pool.clone()).prior_balance("CLI-001").await.unwrap());
    assert_eq!((prior.large, prior.small), (4, 2));

    let warehouse = WarehouseRepository::new(pool.clone()).current().await.unwrap();
    assert_eq!(warehouse.counts(), TrayCounts::new(70, 30));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_movement_rejects_stale_or_partial_prior(pool: PgPool) {
    let operator = operator();
    stock_warehouse(&pool, 100, 50).await;
    let route_id = start_route(&pool, "R-001", 30, 20).await;
    create_client(&pool, "CLI-001").await;
    let controller = MovementController::new(pool.clone());

    controller
        .create(
            request(json!({"route_id": route_id, "client_code": "CLI-001", "dropped_large": 3})),
            &operator,
        )
        .await
        .unwrap();

    let stale = controller
        .create(
            request(json!({
                "route_id": route_id, "client_code": "CLI-001", "dropped_large": 1,
                "prior_large": 0, "prior_small": 0
            })),
            &operator,
        )
        .await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let partial = controller
        .create(
            request(json!({
                "route_id": route_id, "client_code": "CLI-001", "dropped_large": 1, "prior_large": 3
            })),
            &operator,
        )
        .await;
    assert!(matches!(partial, Err(AppError::BadRequest(_))));

    assert_eq!(count(&pool, "client_movements").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_latest_balance_follows_insert_order(pool: PgPool) {
    let operator = operator();
    stock_warehouse(&pool, 100, 50).await;
    let first_route = start_route(&pool, "R-001", 20, 0).await;
    let second_route = start_route(&pool, "R-002", 20, 0).await;
    create_client(&pool, "CLI-001").await;
    let controller = MovementController::new(pool.clone());

    controller
        .create(
            request(json!({"route_id": first_route, "client_code": "CLI-001", "dropped_large": 5})),
            &operator,
        )
        .await
        .unwrap();
    let later = data(
        controller
            .create(
                request(json!({"route_id": second_route, "client_code": "CLI-001", "dropped_large": 3})),
                &operator,
            )
            .await
            .unwrap(),
    );
    assert_eq!(later.client_balance, TrayCounts::new(8, 0));

    // Una transacción que empezó antes y esperó un bloqueo queda con un
    // moved_at anterior aunque se insertó después
    sqlx::query("UPDATE client_movements SET moved_at = moved_at - interval '1 minute' WHERE id = $1")
        .bind(later.movement.id)
        .execute(&pool)
        .await
        .unwrap();

    let latest = ClientRepository::latest_balance(&pool, "CLI-001").await.unwrap().unwrap();
    assert_eq!(latest.balance, TrayCounts::new(8, 0));

    let history = data(ClientController::new(pool.clone()).history("CLI-001").await.unwrap());
    assert_eq!(history.balance, TrayCounts::new(8, 0));

    let inventory = data(ClientController::new(pool.clone()).inventory().await.unwrap());
    let row = inventory.iter().find(|row| row.code == "CLI-001").unwrap();
    assert_eq!((row.balance_large, row.balance_small), (8, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finished_route_is_closed(pool: PgPool) {
    let admin = admin();
    stock_warehouse(&pool, 100, 50).await;
    let route_id = start_route(&pool, "R-001", 30, 20).await;
    create_client(&pool, "CLI-001").await;
    let routes = RouteController::new(pool.clone());

    let finished = data(
        routes
            .finish(route_id, request(json!({"returned_large": 25, "returned_small": 20})), &admin)
            .await
            .unwrap(),
    );
    assert_eq!(finished.warehouse, TrayCounts::new(95, 50));
    assert_eq!(finished.difference, TrayCounts::new(5, 0));

    let again = routes
        .finish(route_id, request(json!({"returned_large": 25, "returned_small": 20})), &admin)
        .await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));

    let movement = MovementController::new(pool.clone())
        .create(
            request(json!({"route_id": route_id, "client_code": "CLI-001", "dropped_large": 1})),
            &admin,
        )
        .await;
    assert!(matches!(movement, Err(AppError::InvalidState(_))));

    let warehouse = WarehouseRepository::new(pool.clone()).current().await.unwrap();
    assert_eq!(warehouse.counts(), TrayCounts::new(95, 50));
    assert_eq!(count(&pool, "client_movements").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_movement_restores_started_route(pool: PgPool) {
    let admin = admin();
    stock_warehouse(&pool, 100, 50).await;
    let route_id = start_route(&pool, "R-001", 30, 20).await;
    create_client(&pool, "CLI-001").await;
    let movements = MovementController::new(pool.clone());

    let created = data(
        movements
            .create(
                request(json!({
                    "route_id": route_id, "client_code": "CLI-001",
                    "dropped_large": 10, "picked_large": 4
                })),
                &admin,
            )
            .await
            .unwrap(),
    );
    assert_eq!(created.route_current, TrayCounts::new(24, 20));

    movements.delete(created.movement.id, &admin).await.unwrap();

    let route = data(RouteController::new(pool.clone()).get(route_id).await.unwrap());
    assert_eq!(route.current(), TrayCounts::new(30, 20));
    assert!(ClientRepository::latest_balance(&pool, "CLI-001").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_warehouse_update_checks_version(pool: PgPool) {
    let admin = admin();
    let controller = WarehouseController::new(pool.clone());

    let updated = data(
        controller
            .update(request(json!({"large": 100, "small": 50, "version": 0})), &admin)
            .await
            .unwrap(),
    );
    assert_eq!(updated.version, 1);

    let stale = controller
        .update(request(json!({"large": 80, "small": 50, "version": 0})), &admin)
        .await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let mut conn = pool.acquire().await.unwrap();
    let lost_race = WarehouseRepository::supersede(&mut conn, 0, TrayCounts::new(1, 1), None, "admin").await;
    assert!(matches!(lost_race, Err(AppError::Conflict(_))));

    let current = WarehouseRepository::new(pool.clone()).current().await.unwrap();
    assert_eq!(current.counts(), TrayCounts::new(100, 50));
    assert_eq!(current.version, 1);
    assert_eq!(count(&pool, "warehouse_history").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_supplier_movement_leaves_no_trace(pool: PgPool) {
    let admin = admin();
    stock_warehouse(&pool, 100, 50).await;
    let suppliers = SupplierController::new(pool.clone());
    let supplier = data(
        suppliers
            .create(request(json!({"name": "Plásticos del Norte", "product": "Charola"})), &admin)
            .await
            .unwrap(),
    );

    let incoming = data(
        suppliers
            .register_movement(supplier.id, request(json!({"kind": "entrada", "incoming_large": 50})), &admin)
            .await
            .unwrap(),
    );
    assert_eq!(incoming.supplier_balance, TrayCounts::new(50, 0));
    assert_eq!(incoming.warehouse, TrayCounts::new(150, 50));

    // Más de lo que el proveedor tiene
    let overdrawn = suppliers
        .register_movement(supplier.id, request(json!({"kind": "salida", "outgoing_large": 60})), &admin)
        .await;
    assert!(matches!(overdrawn, Err(AppError::NegativeBalance(_))));

    // Escritura parcial descartada al perder la carrera de versión
    {
        let mut tx = pool.begin().await.unwrap();
        SupplierRepository::insert_movement(
            &mut *tx,
            NewSupplierMovement {
                supplier_id: supplier.id,
                kind: SupplierMovementKind::Outgoing,
                prior: TrayCounts::new(50, 0),
                incoming: TrayCounts::ZERO,
                outgoing: TrayCounts::new(10, 0),
                final_balance: TrayCounts::new(40, 0),
                notes: None,
                recorded_by: "admin",
            },
        )
        .await
        .unwrap();
        let lost_race =
            WarehouseRepository::supersede(&mut *tx, 0, TrayCounts::new(140, 50), None, "admin").await;
        assert!(matches!(lost_race, Err(AppError::Conflict(_))));
    }

    let balance = data(suppliers.balance(supplier.id).await.unwrap());
    assert_eq!((balance.large, balance.small), (50, 0));
    assert_eq!(count(&pool, "supplier_movements").await, 1);

    let warehouse = WarehouseRepository::new(pool.clone()).current().await.unwrap();
    assert_eq!(warehouse.counts(), TrayCounts::new(150, 50));
}

fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 1,
        username: "admin".to_string(),
        role: UserRole::Administrator,
    }
}

fn operator() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 2,
        username: "operador".to_string(),
        role: UserRole::User,
    }
}

fn request<T: DeserializeOwned>(body: Value) -> T {
    serde_json::from_value(body).expect("request de test inválido")
}

fn data<T>(response: ApiResponse<T>) -> T {
    response.data.expect("respuesta sin datos")
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

async fn stock_warehouse(pool: &PgPool, large: i32, small: i32) {
    WarehouseController::new(pool.clone())
        .update(request(json!({"large": large, "small": small, "notes": "Conteo inicial"})), &admin())
        .await
        .unwrap();
}

async fn create_courier(pool: &PgPool) -> i32 {
    let courier = data(
        CourierController::new(pool.clone())
            .create(request(json!({"first_name": "Juan", "last_name": "Pérez"})), &admin())
            .await
            .unwrap(),
    );
    courier.id
}

async fn start_route(pool: &PgPool, code: &str, large: i32, small: i32) -> i32 {
    let courier_id = create_courier(pool).await;
    let started = data(
        RouteController::new(pool.clone())
            .start(
                request(json!({
                    "code": code, "name": "Ruta de prueba", "courier_id": courier_id,
                    "large": large, "small": small
                })),
                &admin(),
            )
            .await
            .unwrap(),
    );
    started.route.id
}

async fn create_client(pool: &PgPool, code: &str) {
    ClientController::new(pool.clone())
        .create(request(json!({"code": code, "name": "Tienda La Esquina"})), &admin())
        .await
        .unwrap();
}
