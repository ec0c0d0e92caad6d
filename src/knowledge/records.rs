//! Static disease records, one per class label.

use super::DiseaseRecord;

/// Records for every entry of `CLASS_LABELS`, in the same order
pub const DISEASE_RECORDS: [DiseaseRecord; 24] = [
    DiseaseRecord {
        name: "Acne",
        description: "A common skin condition that occurs when hair follicles become clogged with oil and dead skin cells, leading to pimples, blackheads, and whiteheads.",
        cause: "Hormonal changes, excessive oil production, bacteria, and inflammation.",
        treatment: "Use topical treatments (benzoyl peroxide, salicylic acid), oral medications, and maintain proper skincare.",
    },
    DiseaseRecord {
        name: "Actinic Keratosis",
        description: "A rough, scaly patch on the skin caused by years of sun exposure, which may develop into skin cancer if untreated.",
        cause: "Long-term exposure to ultraviolet (UV) light from the sun or tanning beds.",
        treatment: "Cryotherapy, laser therapy, chemical peels, and topical medications.",
    },
    DiseaseRecord {
        name: "Benign Tumors",
        description: "Non-cancerous growths on or under the skin, usually harmless but sometimes requiring removal.",
        cause: "Genetic factors, infections, or environmental exposure.",
        treatment: "Monitoring, surgical removal, or laser therapy if necessary.",
    },
    DiseaseRecord {
        name: "Bullous",
        description: "A skin condition that causes large, fluid-filled blisters, often due to immune system disorders.",
        cause: "Autoimmune diseases, infections, or allergic reactions.",
        treatment: "Corticosteroids, immunosuppressants, and proper wound care.",
    },
    DiseaseRecord {
        name: "Candidiasis",
        description: "A fungal infection caused by Candida yeast, often affecting warm, moist areas of the body.",
        cause: "Weakened immune system, diabetes, prolonged antibiotic use, and poor hygiene.",
        treatment: "Antifungal creams, oral antifungal medications, and maintaining proper hygiene.",
    },
    DiseaseRecord {
        name: "Drug Eruption",
        description: "An adverse skin reaction caused by medications, leading to rashes, redness, or blisters.",
        cause: "Allergic reaction or sensitivity to certain drugs.",
        treatment: "Stopping the medication, antihistamines, corticosteroids, and hydration.",
    },
    DiseaseRecord {
        name: "Eczema",
        description: "A condition that makes the skin red, inflamed, and itchy.",
        cause: "Genetics, allergens, irritants, and environmental triggers.",
        treatment: "Moisturizers, corticosteroids, and avoiding known triggers.",
    },
    DiseaseRecord {
        name: "Hives (Urticaria)",
        description: "A skin reaction that causes itchy welts due to an allergic reaction or unknown triggers.",
        cause: "Allergens, stress, infections, or medications.",
        treatment: "Antihistamines, corticosteroids, and avoiding allergens.",
    },
    DiseaseRecord {
        name: "Infestations Bites",
        description: "Skin irritation and rashes caused by insect bites or parasitic infections such as scabies or lice.",
        cause: "Bites from mosquitoes, fleas, ticks, mites, or lice infestations.",
        treatment: "Topical creams, antihistamines, and proper hygiene to prevent further infestations.",
    },
    DiseaseRecord {
        name: "Lichen",
        description: "A skin condition characterized by thick, scaly patches that may be itchy or painful.",
        cause: "Autoimmune reactions, chronic inflammation, or unknown triggers.",
        treatment: "Corticosteroid creams, antihistamines, and phototherapy.",
    },
    DiseaseRecord {
        name: "Lupus",
        description: "An autoimmune disease that affects the skin, causing rashes and sensitivity to sunlight.",
        cause: "Genetic predisposition, environmental factors, and immune system dysfunction.",
        treatment: "Anti-inflammatory drugs, immunosuppressants, and avoiding sunlight exposure.",
    },
    DiseaseRecord {
        name: "Melanoma",
        description: "A serious and aggressive form of skin cancer that develops from melanocytes.",
        cause: "Excessive UV exposure, genetic mutations, and fair skin type.",
        treatment: "Surgical removal, chemotherapy, immunotherapy, and radiation therapy.",
    },
    DiseaseRecord {
        name: "Moles",
        description: "Clusters of pigmented skin cells that appear as small, dark brown spots.",
        cause: "Genetic factors, sun exposure, and hormonal changes.",
        treatment: "Usually harmless, but removal is recommended if a mole changes in size, shape, or color.",
    },
    DiseaseRecord {
        name: "Psoriasis",
        description: "A chronic autoimmune skin disease that speeds up the life cycle of skin cells, causing scaly patches.",
        cause: "Immune system dysfunction, genetic factors, and environmental triggers.",
        treatment: "Topical treatments, phototherapy, and systemic medications.",
    },
    DiseaseRecord {
        name: "Rosacea",
        description: "A chronic skin condition causing redness, visible blood vessels, and bumps on the face.",
        cause: "Unknown, but triggers include sun exposure, stress, spicy foods, and alcohol.",
        treatment: "Topical treatments, antibiotics, laser therapy, and avoiding triggers.",
    },
    DiseaseRecord {
        name: "Seborrh Keratoses",
        description: "Non-cancerous, wart-like growths that appear on the skin, often with age.",
        cause: "Genetics and aging.",
        treatment: "Cryotherapy, laser removal, or electrosurgery if necessary.",
    },
    DiseaseRecord {
        name: "Skin Cancer",
        description: "Uncontrolled growth of abnormal skin cells, often due to sun exposure.",
        cause: "UV radiation, genetics, and weakened immune system.",
        treatment: "Surgery, chemotherapy, radiation therapy, and immunotherapy.",
    },
    DiseaseRecord {
        name: "Sunlight Damage",
        description: "Skin damage caused by prolonged exposure to UV rays, leading to premature aging and increased cancer risk.",
        cause: "Excessive sun exposure, tanning beds, and lack of sunscreen use.",
        treatment: "Sunscreen, antioxidants, retinoids, and skin-repairing treatments.",
    },
    DiseaseRecord {
        name: "Tinea",
        description: "A fungal infection affecting the skin, scalp, or nails, also known as ringworm.",
        cause: "Fungal overgrowth due to moisture, poor hygiene, or direct contact.",
        treatment: "Antifungal creams, oral antifungal medications, and maintaining dry skin.",
    },
    DiseaseRecord {
        name: "Unknown or No Disease",
        description: "No recognizable skin disease detected.",
        cause: "N/A",
        treatment: "Consult a dermatologist if symptoms persist.",
    },
    DiseaseRecord {
        name: "Vascular Tumors",
        description: "Abnormal growth of blood vessels in the skin, which may be benign or malignant.",
        cause: "Genetic mutations, environmental triggers, or unknown causes.",
        treatment: "Monitoring, laser therapy, or surgical removal if necessary.",
    },
    DiseaseRecord {
        name: "Vasculitis",
        description: "Inflammation of blood vessels, leading to skin rashes, ulcers, or organ damage.",
        cause: "Autoimmune conditions, infections, or allergic reactions.",
        treatment: "Corticosteroids, immunosuppressants, and managing underlying conditions.",
    },
    DiseaseRecord {
        name: "Vitiligo",
        description: "A condition where the skin loses its pigment cells, causing white patches.",
        cause: "Autoimmune disorder, genetic factors, and unknown triggers.",
        treatment: "Topical corticosteroids, light therapy, and skin grafting.",
    },
    DiseaseRecord {
        name: "Warts",
        description: "Small, rough skin growths caused by the human papillomavirus (HPV).",
        cause: "Direct contact with HPV, weakened immune system.",
        treatment: "Cryotherapy, salicylic acid, and laser removal.",
    },
];
