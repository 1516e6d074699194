use serde::{Deserialize, Serialize};

/// One question/answer pair. Its identity is its position in the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

const BUILTIN_FAQ: &[(&str, &str, &str)] = &[
    (
        "What is your return policy?",
        "We offer a 30-day return policy for all products. Items must be in original condition with all packaging and accessories. Please initiate returns through your account dashboard or contact support.",
        "returns",
    ),
    (
        "How long does shipping take?",
        "Standard shipping takes 5-7 business days. Express shipping (2-3 days) and overnight shipping options are available at checkout for an additional fee.",
        "shipping",
    ),
    (
        "Do you ship internationally?",
        "Yes, we ship to over 50 countries worldwide. International shipping times vary by location (typically 10-15 business days). Customs fees may apply depending on your country.",
        "shipping",
    ),
    (
        "How can I track my order?",
        "Once your order ships, you'll receive a tracking number via email. You can also track your order by logging into your account and viewing order history. Tracking updates may take 24 hours to appear.",
        "tracking",
    ),
    (
        "What payment methods do you accept?",
        "We accept all major credit cards (Visa, MasterCard, American Express, Discover), PayPal, Apple Pay, Google Pay, and bank transfers. Payment is processed securely through encrypted connections.",
        "payment",
    ),
    (
        "How do I cancel my order?",
        "Orders can be cancelled within 2 hours of placement. Log into your account, go to order history, and click 'Cancel Order'. If your order has already shipped, you'll need to initiate a return instead.",
        "orders",
    ),
    (
        "Is there a warranty on products?",
        "All products come with a manufacturer's warranty (typically 1-2 years depending on the item). Extended warranty options are available at checkout. Warranty details are included with your product.",
        "warranty",
    ),
    (
        "How do I reset my password?",
        "Click 'Forgot Password' on the login page and enter your email address. You'll receive a password reset link within 5 minutes. If you don't receive it, check your spam folder or contact support.",
        "account",
    ),
    (
        "Can I change my shipping address?",
        "Shipping addresses can be changed before the order ships. Contact customer support immediately or update it in your order details. Once shipped, the address cannot be changed.",
        "shipping",
    ),
    (
        "Do you offer student discounts?",
        "Yes! Students receive 10% off all purchases. Verify your student status through our partner verification service. The discount will be automatically applied at checkout once verified.",
        "discounts",
    ),
    (
        "How do I contact customer support?",
        "You can reach our support team via email at support@example.com, phone at 1-800-TECH-HELP (Mon-Fri 9AM-6PM EST), or live chat on our website. Average response time is under 2 hours.",
        "support",
    ),
    (
        "Are the products genuine?",
        "Yes, all products sold on our platform are 100% authentic and sourced directly from manufacturers or authorized distributors. We guarantee authenticity and provide certificates when applicable.",
        "products",
    ),
    (
        "What if I receive a damaged product?",
        "If you receive a damaged product, please contact us within 48 hours with photos of the damage. We'll arrange a free return and send a replacement immediately or issue a full refund.",
        "returns",
    ),
    (
        "Can I modify my order after placing it?",
        "Order modifications are possible within 2 hours of placement. Contact customer support immediately. After this window, orders enter processing and cannot be modified.",
        "orders",
    ),
    (
        "Do you have a loyalty program?",
        "Yes! Our rewards program gives you 5 points for every dollar spent. Points can be redeemed for discounts, free shipping, and exclusive products. Join free through your account dashboard.",
        "loyalty",
    ),
];

/// E-commerce support FAQ used when no knowledge base file is supplied.
pub fn builtin_knowledge_base() -> Vec<KnowledgeEntry> {
    BUILTIN_FAQ
        .iter()
        .map(|(question, answer, category)| {
            KnowledgeEntry::new(*question, *answer).with_category(*category)
        })
        .collect()
}
