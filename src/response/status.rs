//! Named status helpers
//!
//! One method per standard status: `writer.not_found(&mut res, "gone")` sets
//! the status and sends the body in one call.

use super::{Body, ResponseWriter};
use crate::channel::ResponseChannel;
use crate::error::ResponseResult;
use hyper::StatusCode;

macro_rules! status_helpers {
    ($($name:ident => $status:ident,)*) => {
        /// Every helper name with the status it sends
        pub const STATUS_HELPERS: &[(&str, StatusCode)] = &[
            $((stringify!($name), StatusCode::$status),)*
        ];

        impl ResponseWriter {
            $(
                #[doc = concat!("Send `body` with status `", stringify!($status), "`")]
                pub async fn $name<C: ResponseChannel>(
                    &self,
                    res: &mut C,
                    body: impl Into<Body>,
                ) -> ResponseResult<()> {
                    self.set_status(res, StatusCode::$status.as_u16())?;
                    self.send(res, body).await
                }
            )*
        }
    };
}

status_helpers! {
    ok => OK,
    created => CREATED,
    accepted => ACCEPTED,
    non_authoritative_information => NON_AUTHORITATIVE_INFORMATION,
    no_content => NO_CONTENT,
    reset_content => RESET_CONTENT,
    partial_content => PARTIAL_CONTENT,
    multiple_choices => MULTIPLE_CHOICES,
    moved_permanently => MOVED_PERMANENTLY,
    found => FOUND,
    see_other => SEE_OTHER,
    not_modified => NOT_MODIFIED,
    use_proxy => USE_PROXY,
    temporary_redirect => TEMPORARY_REDIRECT,
    permanent_redirect => PERMANENT_REDIRECT,
    bad_request => BAD_REQUEST,
    unauthorized => UNAUTHORIZED,
    payment_required => PAYMENT_REQUIRED,
    forbidden => FORBIDDEN,
    not_found => NOT_FOUND,
    method_not_allowed => METHOD_NOT_ALLOWED,
    not_acceptable => NOT_ACCEPTABLE,
    proxy_authentication_required => PROXY_AUTHENTICATION_REQUIRED,
    request_timeout => REQUEST_TIMEOUT,
    conflict => CONFLICT,
    gone => GONE,
    length_required => LENGTH_REQUIRED,
    precondition_failed => PRECONDITION_FAILED,
    payload_too_large => PAYLOAD_TOO_LARGE,
    uri_too_long => URI_TOO_LONG,
    unsupported_media_type => UNSUPPORTED_MEDIA_TYPE,
    range_not_satisfiable => RANGE_NOT_SATISFIABLE,
    expectation_failed => EXPECTATION_FAILED,
    im_a_teapot => IM_A_TEAPOT,
    misdirected_request => MISDIRECTED_REQUEST,
    unprocessable_entity => UNPROCESSABLE_ENTITY,
    locked => LOCKED,
    failed_dependency => FAILED_DEPENDENCY,
    upgrade_required => UPGRADE_REQUIRED,
    precondition_required => PRECONDITION_REQUIRED,
    too_many_requests => TOO_MANY_REQUESTS,
    request_header_fields_too_large => REQUEST_HEADER_FIELDS_TOO_LARGE,
    unavailable_for_legal_reasons => UNAVAILABLE_FOR_LEGAL_REASONS,
    internal_server_error => INTERNAL_SERVER_ERROR,
    not_implemented => NOT_IMPLEMENTED,
    bad_gateway => BAD_GATEWAY,
    service_unavailable => SERVICE_UNAVAILABLE,
    gateway_timeout => GATEWAY_TIMEOUT,
    http_version_not_supported => HTTP_VERSION_NOT_SUPPORTED,
    variant_also_negotiates => VARIANT_ALSO_NEGOTIATES,
    insufficient_storage => INSUFFICIENT_STORAGE,
    loop_detected => LOOP_DETECTED,
    not_extended => NOT_EXTENDED,
    network_authentication_required => NETWORK_AUTHENTICATION_REQUIRED,
}
