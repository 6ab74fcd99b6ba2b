mod backend_http;
mod end_to_end;
mod platform_rules;
