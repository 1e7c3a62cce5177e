//! Method selection by package/service/method name

use rpc_bones_common::{MethodDescriptor, ServiceDescriptor};

/// Whether a method is selected by any of `targets`
///
/// A target may name the service, `Service.Method`, or the bare method,
/// each optionally qualified with the proto package, or the package
/// alone. An empty target list selects everything.
pub fn matches_target(
    service: &ServiceDescriptor,
    method: &MethodDescriptor,
    targets: &[String],
) -> bool {
    if targets.is_empty() {
        return true;
    }

    let svc = service.name.as_str();
    let mthd = method.name.as_str();
    let mut candidates = vec![
        svc.to_string(),
        format!("{}.{}", svc, mthd),
        mthd.to_string(),
    ];
    if !service.package.is_empty() {
        let pkg = service.package.as_str();
        candidates.push(pkg.to_string());
        candidates.push(format!("{}.{}", pkg, svc));
        candidates.push(format!("{}.{}.{}", pkg, svc, mthd));
    }

    targets.iter().any(|t| candidates.contains(t))
}
