//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, response::IntoResponse, routing::get};

use crate::filters;
use crate::models::PageContext;
use crate::state::AppState;

/// One titled block of a policy page.
pub struct PolicySection {
    pub anchor: &'static str,
    pub title: &'static str,
    pub items: &'static [PolicyItem],
}

/// A headed paragraph within a policy section.
pub struct PolicyItem {
    pub heading: &'static str,
    pub body: &'static str,
}

/// Refund, returns, shipping and privacy policy.
pub const POLICY_SECTIONS: &[PolicySection] = &[
    PolicySection {
        anchor: "refunds",
        title: "Refund Policy",
        items: &[
            PolicyItem {
                heading: "Eligibility for Refunds",
                body: "Refunds are only available for products that are returned in their original condition \
                       within 15 days of purchase.",
            },
            PolicyItem {
                heading: "Refund Process",
                body: "To request a refund, please contact our customer support team with your order details.",
            },
            PolicyItem {
                heading: "Refund Timeframe",
                body: "Once your return is received and inspected, we will send you an email to notify you that \
                       we have received your returned item and the approval or rejection of your refund. Once \
                       approved, refunds will take 15 days to be credited into the beneficiary's bank account.",
            },
            PolicyItem {
                heading: "Exchanges",
                body: "We only replace items if they are defective or damaged. In case of exchanges, we will \
                       initiate the process within 7 days and the replacement will be delivered within 7 days.",
            },
        ],
    },
    PolicySection {
        anchor: "returns",
        title: "Return Policy",
        items: &[
            PolicyItem {
                heading: "Eligibility for Returns",
                body: "To be eligible for a return, your item must be unused and in the same condition that you \
                       received it.",
            },
            PolicyItem {
                heading: "Return Process",
                body: "To initiate a return, please contact our customer support team within 7 days of \
                       receiving your item.",
            },
            PolicyItem {
                heading: "Return Shipping",
                body: "You will be responsible for paying for your own shipping costs for returning your item.",
            },
            PolicyItem {
                heading: "Return Timeframe",
                body: "In case of an approved return, your replacement will be delivered within 7 days.",
            },
        ],
    },
    PolicySection {
        anchor: "shipping",
        title: "Shipping Policy",
        items: &[
            PolicyItem {
                heading: "Shipping Rates",
                body: "Shipping rates are calculated based on the weight of your order and your location.",
            },
            PolicyItem {
                heading: "Shipping Times",
                body: "Orders are typically processed, shipped and delivered within 3 business days.",
            },
            PolicyItem {
                heading: "International Shipping",
                body: "We offer international shipping to select countries. Please note that customs duties and \
                       taxes may apply. Orders will be delivered within 7 business days.",
            },
            PolicyItem {
                heading: "Order Tracking",
                body: "Once your order has shipped, you will receive a tracking number via email.",
            },
        ],
    },
    PolicySection {
        anchor: "privacy",
        title: "Privacy Policy",
        items: &[
            PolicyItem {
                heading: "Information We Collect",
                body: "We collect personal information such as your name, email address, and payment details \
                       when you place an order or sign up for our newsletter.",
            },
            PolicyItem {
                heading: "How We Use Your Information",
                body: "We use your information to process your orders, communicate with you, and improve our \
                       services.",
            },
            PolicyItem {
                heading: "Cookies",
                body: "We use cookies to personalize content, analyze our traffic, and improve your browsing \
                       experience.",
            },
            PolicyItem {
                heading: "Data Security",
                body: "We take precautions to protect your information both online and offline.",
            },
            PolicyItem {
                heading: "Changes to This Privacy Policy",
                body: "We reserve the right to update or change our Privacy Policy at any time.",
            },
        ],
    },
];

/// Policy page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/refund_policy.html")]
pub struct RefundPolicyTemplate {
    pub page: PageContext,
    pub sections: &'static [PolicySection],
}

/// Display the refund, returns, shipping and privacy policy.
pub async fn refund_policy(page: PageContext) -> impl IntoResponse {
    RefundPolicyTemplate {
        page,
        sections: POLICY_SECTIONS,
    }
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/refund-policy", get(refund_policy))
}
