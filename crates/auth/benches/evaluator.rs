use backoffice_auth::{Permission, Role, authorize_any, catalog};
use backoffice_core::RoleId;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_authorize_any(c: &mut Criterion) {
    let role = Role::new(RoleId::new(2), "editor");
    let granted: Vec<Permission> = (0..64)
        .map(|i| Permission::new(format!("resource{i}"), "read"))
        .chain(std::iter::once(catalog::ROLES_READ))
        .collect();
    let acceptable = [catalog::MENUS_READ, catalog::ROLES_READ];

    c.bench_function("authorize_any/granted_last", |b| {
        b.iter(|| authorize_any(black_box(&role), black_box(&granted), black_box(&acceptable)))
    });

    let denied = [catalog::ROLES_WRITE];
    c.bench_function("authorize_any/denied", |b| {
        b.iter(|| authorize_any(black_box(&role), black_box(&granted), black_box(&denied)))
    });
}

criterion_group!(benches, bench_authorize_any);
criterion_main!(benches);
