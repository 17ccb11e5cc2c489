/* demos/demo.rs */

use myip::{RequestContext, get_info};

fn main() {
    println!("=== myip detection examples ===\n");

    show(
        "Direct connection",
        RequestContext::new("203.0.113.45:51234"),
    );

    show(
        "Behind nginx (X-Real-IP)",
        RequestContext::new("10.0.0.2:40000").with_header("X-Real-IP", "198.51.100.42"),
    );

    show(
        "Proxy chain with a junk leading entry",
        RequestContext::new("10.0.0.2:40000")
            .with_header("X-Forwarded-For", "unknown, 203.0.113.1, 192.168.1.10"),
    );

    show(
        "Cloudflare outranks X-Forwarded-For",
        RequestContext::new("[2001:db8::5]:443")
            .with_header("X-Forwarded-For", "203.0.113.2")
            .with_header("CF-Connecting-IP", "203.0.113.1")
            .with_header("CF-Ray", "8a1b2c3d4e5f-AMS"),
    );

    show(
        "Dual stack through X-Forwarded-For",
        RequestContext::new("127.0.0.1:8080")
            .with_header("X-Forwarded-For", "2001:db8::1, 203.0.113.1"),
    );

    show("Malformed peer address", RequestContext::new("malformed-addr"));

    println!("=== All examples completed! ===");
}

fn show(title: &str, ctx: RequestContext) {
    let info = get_info(&ctx);

    println!("{title}");
    for (name, value) in ctx.headers() {
        println!("  {name}: {value}");
    }
    println!("  peer: {}", ctx.peer_addr());
    println!("  -> client ip:   {} (via {})", info.client_ip, info.detected_via);
    println!("  -> ipv4:        {}", display_or_none(&info.ipv4_address));
    println!("  -> ipv6:        {}", display_or_none(&info.ipv6_address));
    println!("  -> private:     {}", info.is_private_ip);
    println!("  -> cloudflare:  {}", info.is_cloudflare);
    println!();
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() { "(none)" } else { value }
}
